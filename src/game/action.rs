/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The direction pointing the other way along the same axis
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Something the player can ask a session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Begin the first game
    Start,
    /// Begin a fresh game after game over
    Restart,
    /// Leave the paused state
    Resume,
    /// Flip between running and paused
    TogglePause,
    /// Queue a new heading
    Steer(Direction),
    /// Press whichever overlay button is showing (start, resume or play again)
    Confirm,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Steer(direction)
    }
}
