//! Keypad input: translation of terminal key events into register actions.
//!
//! The mapping is a pure function so it can be tested without a terminal.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Discrete actions the register understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAction {
    Digit(u8),
    DecimalPoint,
    Backspace,
    Clear,
    Quit,
}

/// Map a key event to a register action, if any.
pub fn action_for_key(key: KeyEvent) -> Option<RegisterAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char(c @ '0'..='9'), KeyModifiers::NONE) => {
            Some(RegisterAction::Digit(c as u8 - b'0'))
        }
        (KeyCode::Char('.'), KeyModifiers::NONE) => Some(RegisterAction::DecimalPoint),
        (KeyCode::Backspace, _) => Some(RegisterAction::Backspace),
        // Ctrl-C must win over the clear mapping below
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(RegisterAction::Quit),
        (KeyCode::Char('c' | 'C'), _) | (KeyCode::Delete, _) => Some(RegisterAction::Clear),
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
            Some(RegisterAction::Quit)
        }
        _ => None,
    }
}
