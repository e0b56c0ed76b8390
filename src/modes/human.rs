use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{GameConfig, Phase, Session};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive play in the terminal
///
/// Key events and timer ticks are both handled on this task, one at a time,
/// so a turn queued between two ticks is always visible to the next tick.
pub struct HumanMode {
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            session: Session::new(config),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        // Raw mode is already on; a failed setup must give the shell its terminal back
        let mut terminal = undo_on_error(Self::setup_terminal, || {
            let _ = execute!(stderr(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session closed"
        );

        result
    }

    /// Everything after raw mode; the caller undoes raw mode on error
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        Ok(terminal)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.session.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Redraw only after something changed
        let mut dirty = true;

        loop {
            if dirty {
                terminal
                    .draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics);
                    })
                    .context("Failed to draw frame")?;
                dirty = false;
            }

            let was_running = self.session.is_running();

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => dirty |= self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Only polled while running, which freezes the board otherwise
                _ = tick_timer.tick(), if self.session.is_running() => {
                    dirty |= self.update_game();
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // First tick comes a full period after (re)entering Running
            if !was_running && self.session.is_running() {
                tick_timer.reset();
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one terminal event; returns true when the screen needs a redraw
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Game(action) => {
                        let before = self.session.phase();
                        let changed = self.session.apply(action);

                        if matches!(before, Phase::Idle | Phase::Over)
                            && self.session.is_running()
                        {
                            self.metrics.on_game_start();
                        }
                        if !changed {
                            debug!(?action, phase = ?before, "action ignored");
                        }
                        changed
                    }
                    KeyAction::Quit => {
                        self.should_quit = true;
                        false
                    }
                    KeyAction::None => false,
                }
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    /// Run one tick; returns true when the board moved
    fn update_game(&mut self) -> bool {
        let Some(result) = self.session.tick() else {
            return false;
        };

        if result.ate_food {
            self.metrics.on_food_eaten();
        }
        if result.terminated() {
            self.metrics.on_game_over(self.session.score());
        }

        true
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Run `setup`, calling `undo` only if it fails
fn undo_on_error<T>(setup: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        undo();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    #[test]
    fn test_failed_setup_is_undone() {
        let mut undone = false;
        let result: Result<()> =
            undo_on_error(|| Err(anyhow::anyhow!("no terminal")), || undone = true);
        assert!(result.is_err());
        assert!(undone);
    }

    #[test]
    fn test_successful_setup_is_kept() {
        let mut undone = false;
        let result = undo_on_error(|| Ok(7), || undone = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!undone);
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.session.phase(), Phase::Idle);
        assert_eq!(mode.session.score(), 0);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_enter_starts_game() {
        let mut mode = mode();
        assert!(mode.handle_event(key(KeyCode::Enter)));
        assert_eq!(mode.session.phase(), Phase::Running);
    }

    #[test]
    fn test_space_pauses_and_resumes() {
        let mut mode = mode();
        // Not started yet: nothing to pause
        assert!(!mode.handle_event(key(KeyCode::Char(' '))));
        assert_eq!(mode.session.phase(), Phase::Idle);

        mode.handle_event(key(KeyCode::Enter));
        assert!(mode.handle_event(key(KeyCode::Char(' '))));
        assert_eq!(mode.session.phase(), Phase::Paused);
        assert!(!mode.update_game());

        assert!(mode.handle_event(key(KeyCode::Char(' '))));
        assert_eq!(mode.session.phase(), Phase::Running);
    }

    #[test]
    fn test_arrow_keys_queue_turns() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));

        assert!(mode.handle_event(key(KeyCode::Up)));
        assert!(mode.handle_event(key(KeyCode::Left)));
        assert!(!mode.handle_event(key(KeyCode::Down)));
        assert_eq!(mode.session.pending().len(), 2);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode();
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!mode.handle_event(Event::Key(release)));
        assert_eq!(mode.session.phase(), Phase::Idle);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_resize_requests_redraw() {
        let mut mode = mode();
        assert!(mode.handle_event(Event::Resize(80, 24)));
    }

    #[test]
    fn test_game_over_updates_metrics() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.session.state_mut().food = Some(Position::new(19, 5));
        mode.session.state_mut().snake = Snake::new(Position::new(18, 5), Direction::Right, 3);

        assert!(mode.update_game());
        assert_eq!(mode.metrics.foods_eaten, 1);
        assert_eq!(mode.session.score(), 10);

        assert!(mode.update_game());
        assert_eq!(mode.session.phase(), Phase::Over);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 10);

        // Play again resets the board but keeps the process stats
        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.session.phase(), Phase::Running);
        assert_eq!(mode.session.score(), 0);
        assert_eq!(mode.metrics.foods_eaten, 0);
        assert_eq!(mode.metrics.high_score, 10);
    }
}
