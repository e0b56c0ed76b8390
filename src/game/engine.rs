use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred; the move was discarded
    pub collision: Option<CollisionType>,
    /// The snake now covers every cell, so no food could be placed
    pub board_filled: bool,
}

impl StepResult {
    /// Whether this step ended the game
    pub fn terminated(&self) -> bool {
        self.collision.is_some() || self.board_filled
    }
}

/// The game engine that handles all board rules
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    ///
    /// Food placement is reproducible when the config carries a seed.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the initial board: centered snake heading right, score 0, fresh food
    pub fn reset(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food(&snake);

        GameState::new(snake, food, self.config.grid_size)
    }

    /// Advance the snake one cell in `direction`
    ///
    /// On collision the board is left exactly as it was.
    pub fn step(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        let new_head = state.snake.head().moved_in_direction(direction);

        if let Some(collision) = self.check_collision(state, new_head) {
            return StepResult {
                ate_food: false,
                collision: Some(collision),
                board_filled: false,
            };
        }

        let ate_food = state.food == Some(new_head);

        // Grow if food was eaten
        state.snake.advance(direction, ate_food);
        state.steps += 1;

        let mut board_filled = false;
        if ate_food {
            state.score += self.config.food_score;
            // Placed against the grown body, new head included
            state.food = self.spawn_food(&state.snake);
            board_filled = state.food.is_none();
        }

        StepResult {
            ate_food,
            collision: None,
            board_filled,
        }
    }

    /// Check if the new head position causes a collision
    ///
    /// Walls are checked first. The whole current body counts, tail included,
    /// since the tail has not moved yet when the new head is evaluated.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by `snake`
    ///
    /// Returns `None` when the snake covers the whole grid.
    pub fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.grid_size;
        if snake.len() >= size * size {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..size) as i32;
            let y = self.rng.gen_range(0..size) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(grid_size: usize) -> GameEngine {
        GameEngine::new(GameConfig {
            grid_size,
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded(20);
        let state = engine.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        assert_eq!(state.snake.direction, Direction::Right);

        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert!(state.is_in_bounds(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded(20);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));

        let result = engine.step(&mut state, Direction::Right);

        assert!(!result.terminated());
        assert!(!result.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10)
            ]
        );
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded(20);
        let mut state = engine.reset();
        state.food = Some(Position::new(11, 10));

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.ate_food);
        assert_eq!(state.score, 10);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_wall_collision_keeps_body() {
        let mut engine = seeded(20);
        let snake = Snake::new(Position::new(19, 5), Direction::Right, 3);
        let mut state = GameState::new(snake, Some(Position::new(0, 0)), 20);
        let before = state.snake.clone();

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.terminated());
        assert_eq!(result.collision, Some(CollisionType::Wall));
        assert_eq!(state.snake, before);
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn test_every_wall_collides() {
        let cases = [
            (Position::new(0, 5), Direction::Left),
            (Position::new(9, 5), Direction::Right),
            (Position::new(5, 0), Direction::Up),
            (Position::new(5, 9), Direction::Down),
        ];

        for (head, direction) in cases {
            let mut engine = seeded(10);
            let snake = Snake::from_segments(vec![head], direction);
            let mut state = GameState::new(snake, Some(Position::new(3, 3)), 10);

            let result = engine.step(&mut state, direction);
            assert_eq!(result.collision, Some(CollisionType::Wall), "{direction:?}");
            assert_eq!(state.snake.body, vec![head]);
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded(10);

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Some(Position::new(8, 8)), 10);

        engine.step(&mut state, Direction::Down); // (5,6) (5,5) (4,5) (3,5) (2,5)
        engine.step(&mut state, Direction::Left); // (4,6) (5,6) (5,5) (4,5) (3,5)
        let before = state.snake.clone();

        // (4,5) is still part of the body
        let result = engine.step(&mut state, Direction::Up);

        assert!(result.terminated());
        assert_eq!(result.collision, Some(CollisionType::SelfCollision));
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_moving_into_current_tail_collides() {
        let mut engine = seeded(10);
        // A 2x2 loop: the head's next cell is the tail, which has not moved yet
        let body = vec![
            Position::new(4, 4),
            Position::new(5, 4),
            Position::new(5, 5),
            Position::new(4, 5),
        ];
        let snake = Snake::from_segments(body, Direction::Left);
        let mut state = GameState::new(snake, Some(Position::new(0, 0)), 10);

        let result = engine.step(&mut state, Direction::Down);
        assert_eq!(result.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_spawn_food_never_on_snake() {
        let mut engine = seeded(4);
        let body: Vec<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .take(15)
            .collect();
        let snake = Snake::from_segments(body, Direction::Right);

        for _ in 0..50 {
            assert_eq!(engine.spawn_food(&snake), Some(Position::new(3, 3)));
        }
    }

    #[test]
    fn test_spawn_food_on_full_board() {
        let mut engine = seeded(2);
        let body = vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
        ];
        let snake = Snake::from_segments(body, Direction::Left);
        assert_eq!(engine.spawn_food(&snake), None);
    }

    #[test]
    fn test_eating_last_free_cell_fills_board() {
        let mut engine = seeded(2);
        let body = vec![Position::new(1, 0), Position::new(1, 1), Position::new(0, 1)];
        let snake = Snake::from_segments(body, Direction::Up);
        let mut state = GameState::new(snake, Some(Position::new(0, 0)), 2);

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.ate_food);
        assert!(result.board_filled);
        assert!(result.terminated());
        assert_eq!(state.food, None);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = seeded(20);
        let mut b = seeded(20);
        assert_eq!(a.reset().food, b.reset().food);
    }
}
