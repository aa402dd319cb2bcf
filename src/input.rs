//! Key-to-action mapping
//!
//! The engine only exposes named operations; which keys trigger them is
//! decided here, from the (hand-editable) bindings in settings.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A gameplay operation, forwarded to the engine
    Game(Action),
    /// Discard the session and start a new one (game over only)
    Restart,
    /// Leave the application
    Quit,
}

/// Maps key events to commands using configured bindings
pub struct InputHandler {
    move_left: Vec<KeyCode>,
    move_right: Vec<KeyCode>,
    soft_drop: Vec<KeyCode>,
    hard_drop: Vec<KeyCode>,
    rotate: Vec<KeyCode>,
    hold: Vec<KeyCode>,
    pause: Vec<KeyCode>,
    restart: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl InputHandler {
    /// Build the handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: parse_keys(&keys.move_left),
            move_right: parse_keys(&keys.move_right),
            soft_drop: parse_keys(&keys.soft_drop),
            hard_drop: parse_keys(&keys.hard_drop),
            rotate: parse_keys(&keys.rotate),
            hold: parse_keys(&keys.hold),
            pause: parse_keys(&keys.pause),
            restart: parse_keys(&keys.restart),
            quit: parse_keys(&keys.quit),
        }
    }

    /// Map one key press; unbound keys return None
    pub fn map(&self, key: KeyEvent) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);

        if self.move_left.contains(&code) {
            Some(Command::Game(Action::MoveLeft))
        } else if self.move_right.contains(&code) {
            Some(Command::Game(Action::MoveRight))
        } else if self.soft_drop.contains(&code) {
            Some(Command::Game(Action::SoftDrop))
        } else if self.hard_drop.contains(&code) {
            Some(Command::Game(Action::HardDrop))
        } else if self.rotate.contains(&code) {
            Some(Command::Game(Action::Rotate))
        } else if self.hold.contains(&code) {
            Some(Command::Game(Action::Hold))
        } else if self.pause.contains(&code) {
            Some(Command::Game(Action::Pause))
        } else if self.restart.contains(&code) {
            Some(Command::Restart)
        } else if self.quit.contains(&code) {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Parse a key name into a KeyCode
fn parse_key(s: &str) -> KeyCode {
    match s.to_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "shift" => KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift),
        s if s.len() == 1 => KeyCode::Char(s.chars().next().unwrap()),
        _ => KeyCode::Null,
    }
}

fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
    keys.iter().map(|s| parse_key(s)).collect()
}

/// Normalize key codes so bindings are case-insensitive
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(
            input.map(press(KeyCode::Left)),
            Some(Command::Game(Action::MoveLeft))
        );
        assert_eq!(
            input.map(press(KeyCode::Char(' '))),
            Some(Command::Game(Action::Rotate))
        );
        assert_eq!(
            input.map(press(KeyCode::Char('w'))),
            Some(Command::Game(Action::HardDrop))
        );
        assert_eq!(input.map(press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(input.map(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(input.map(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_uppercase_letters_match() {
        let input = InputHandler::default();
        assert_eq!(
            input.map(press(KeyCode::Char('A'))),
            Some(Command::Game(Action::MoveLeft))
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let input = InputHandler::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.map(key), Some(Command::Quit));
    }
}
