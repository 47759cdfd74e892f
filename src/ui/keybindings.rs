// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Number of toggleable sections.
pub const SECTION_COUNT: usize = 3;

/// Map digit/shifted-digit keys to section number (1..3).
pub fn map_key_to_digit(k: &KeyEvent) -> Option<usize> {
    match k.code {
        KeyCode::Char('1' | '!') => Some(1),
        KeyCode::Char('2' | '@') => Some(2),
        KeyCode::Char('3' | '#') => Some(3),
        _ => None,
    }
}

/// Check if the key event is a shifted symbol (!, @, #).
pub fn is_shifted_symbol(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('!' | '@' | '#'))
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Up,
    Down,
    /// Enter a directory or play the selected file
    Enter,
    /// Parent directory
    Back,
    ToggleMic,
    Disconnect,
    SmoothingDown,
    SmoothingUp,
    /// Suspend or resume the audio context
    TogglePower,
    NextPreset,
    GainDown,
    GainUp,
    SeekBack,
    SeekForward,
    /// Play the current file again from the start
    Restart,
    ToggleSection(usize),
    Quit,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: &KeyEvent) -> Action {
    if let Some(d) = map_key_to_digit(key) {
        if key.modifiers.contains(KeyModifiers::SHIFT) || is_shifted_symbol(key) {
            return Action::ToggleSection(d);
        }
    }

    match key.code {
        KeyCode::Down => Action::Down,
        KeyCode::Up => Action::Up,
        KeyCode::Enter | KeyCode::Right => Action::Enter,
        KeyCode::Left | KeyCode::Backspace => Action::Back,
        KeyCode::Char('m') => Action::ToggleMic,
        KeyCode::Char('x') => Action::Disconnect,
        KeyCode::Char('[') => Action::SmoothingDown,
        KeyCode::Char(']') => Action::SmoothingUp,
        KeyCode::Char('p') | KeyCode::Char(' ') => Action::TogglePower,
        KeyCode::Char('n') => Action::NextPreset,
        KeyCode::Char('-') => Action::GainDown,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::GainUp,
        KeyCode::Char(',') | KeyCode::Char('<') => Action::SeekBack,
        KeyCode::Char('.') | KeyCode::Char('>') => Action::SeekForward,
        KeyCode::Char('r') => Action::Restart,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_section_toggles() {
        assert_eq!(key_to_action(&key(KeyCode::Char('!'))), Action::ToggleSection(1));
        assert_eq!(
            key_to_action(&KeyEvent::new(KeyCode::Char('3'), KeyModifiers::SHIFT)),
            Action::ToggleSection(3)
        );
        // Plain digits do nothing
        assert_eq!(key_to_action(&key(KeyCode::Char('2'))), Action::None);
        assert_eq!(key_to_action(&key(KeyCode::Char('$'))), Action::None);
    }

    #[test]
    fn test_source_and_analysis_keys() {
        assert_eq!(key_to_action(&key(KeyCode::Char('m'))), Action::ToggleMic);
        assert_eq!(key_to_action(&key(KeyCode::Char('x'))), Action::Disconnect);
        assert_eq!(key_to_action(&key(KeyCode::Char('['))), Action::SmoothingDown);
        assert_eq!(key_to_action(&key(KeyCode::Char(']'))), Action::SmoothingUp);
        assert_eq!(key_to_action(&key(KeyCode::Char('p'))), Action::TogglePower);
        assert_eq!(key_to_action(&key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_transport_keys() {
        assert_eq!(key_to_action(&key(KeyCode::Char(','))), Action::SeekBack);
        assert_eq!(key_to_action(&key(KeyCode::Char('>'))), Action::SeekForward);
        assert_eq!(key_to_action(&key(KeyCode::Char('r'))), Action::Restart);
    }
}
