use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The key belongs to the game and is consumed
    Game(Action),
    Quit,
    /// Not a game key; left alone
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Game(Action::Steer(Direction::Up)),
            KeyCode::Down => KeyAction::Game(Action::Steer(Direction::Down)),
            KeyCode::Left => KeyAction::Game(Action::Steer(Direction::Left)),
            KeyCode::Right => KeyAction::Game(Action::Steer(Direction::Right)),

            KeyCode::Char(' ') => KeyAction::Game(Action::TogglePause),
            // Presses whichever overlay button is showing
            KeyCode::Enter => KeyAction::Game(Action::Confirm),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
