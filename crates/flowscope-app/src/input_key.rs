//! Terminal-agnostic key representation
//!
//! The TUI layer translates backend key events into this enum so the
//! handler layer stays free of terminal library types.

/// A pressed key, normalized for the handler layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    CharCtrl(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}
