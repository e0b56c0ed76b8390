//! Lifecycle of one play session
//!
//! A [`Session`] is the single owner of all mutable game data. The host calls
//! [`Session::apply`] for player input and [`Session::tick`] from its timer,
//! both on the same thread, and redraws whenever either reports a change.

use tracing::{debug, info, trace};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    engine::{GameEngine, StepResult},
    queue::DirectionQueue,
    state::{CollisionType, GameState},
};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing played yet; the welcome overlay is up
    Idle,
    Running,
    Paused,
    Over,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake covers every cell; nowhere left to put food
    BoardFilled,
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    phase: Phase,
    pending: DirectionQueue,
    /// Last direction accepted from the player, queued or applied
    heading: Direction,
    end_reason: Option<EndReason>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let pending = DirectionQueue::new(config.max_queued_directions);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        let heading = state.snake.direction;

        Self {
            engine,
            state,
            phase: Phase::Idle,
            pending,
            heading,
            end_reason: None,
        }
    }

    /// Dispatch a player action; returns true when anything visible changed
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Start => self.start(),
            Action::Restart => self.restart(),
            Action::Resume => self.resume(),
            Action::TogglePause => self.toggle_pause(),
            Action::Steer(direction) => self.steer(direction),
            Action::Confirm => match self.phase {
                Phase::Idle => self.start(),
                Phase::Paused => self.resume(),
                Phase::Over => self.restart(),
                Phase::Running => false,
            },
        }
    }

    /// Idle -> Running with a fresh board
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.begin_game();
        true
    }

    /// Over -> Running with a fresh board
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::Over {
            return false;
        }
        self.begin_game();
        true
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        info!(score = self.state.score, "game resumed");
        self.phase = Phase::Running;
        true
    }

    /// Running <-> Paused; ignored before the first start and after game over
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => {
                info!(score = self.state.score, "game paused");
                self.phase = Phase::Paused;
                true
            }
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Over => false,
        }
    }

    /// Queue a turn for an upcoming tick
    ///
    /// Reversal is judged against the newest queued turn, or the applied
    /// direction when nothing is queued. Rejected when not running, when it
    /// would reverse, or when the queue is full.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let last = self.pending.last().unwrap_or(self.state.snake.direction);
        if direction.is_opposite(last) {
            trace!(?direction, ?last, "reversal rejected");
            return false;
        }

        if !self.pending.push(direction) {
            trace!(?direction, "direction queue full, turn dropped");
            return false;
        }

        self.heading = direction;
        true
    }

    /// Advance the game one cell; does nothing unless running
    pub fn tick(&mut self) -> Option<StepResult> {
        if self.phase != Phase::Running {
            return None;
        }

        let direction = self.pending.pop().unwrap_or(self.state.snake.direction);
        let result = self.engine.step(&mut self.state, direction);

        if result.ate_food {
            debug!(score = self.state.score, length = self.state.snake.len(), "food eaten");
        }

        let reason = match (result.collision, result.board_filled) {
            (Some(collision), _) => Some(EndReason::Collision(collision)),
            (None, true) => Some(EndReason::BoardFilled),
            (None, false) => None,
        };

        if let Some(reason) = reason {
            info!(score = self.state.score, ?reason, "game over");
            self.phase = Phase::Over;
            self.end_reason = Some(reason);
        }

        Some(result)
    }

    /// Reset every piece of mutable state at once and start running
    fn begin_game(&mut self) {
        self.state = self.engine.reset();
        self.pending.clear();
        self.heading = self.state.snake.direction;
        self.end_reason = None;
        self.phase = Phase::Running;
        info!(grid_size = self.state.grid_size, "game started");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable board access for tests and tools that set up positions
    ///
    /// Writes here bypass the game rules: nothing stops food landing on the
    /// snake or the score changing.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn pending(&self) -> &DirectionQueue {
        &self.pending
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }
}
