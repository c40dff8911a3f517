//! Colors and shared styles

use flowscope_core::Direction;
use ratatui::style::{Color, Modifier, Style};

/// Map a backend color keyword (Bootstrap-style names emitted by the
/// ruleset) to a terminal color. Unknown names fall back to white.
pub fn color_from_name(name: Option<&str>) -> Color {
    match name {
        Some("danger") => Color::Red,
        Some("success") => Color::Green,
        Some("warning") => Color::Yellow,
        Some("info") => Color::Cyan,
        Some("primary") => Color::Blue,
        Some("secondary") => Color::DarkGray,
        Some("purple") => Color::Magenta,
        Some("light") => Color::Gray,
        Some("dark") => Color::DarkGray,
        _ => Color::White,
    }
}

/// Color for a raw payload chunk direction: red for client → server,
/// green for server → client.
pub fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::ToServer => Color::Red,
        Direction::ToClient => Color::Green,
    }
}

/// Style for highlighted payload matches.
pub fn mark_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Style for the selected list row.
pub fn selection_style() -> Style {
    Style::default().bg(Color::DarkGray)
}

/// Style for tick boundary marker rows.
pub fn tick_marker_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Style for secondary text (timestamps, counters).
pub fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for card headers in the detail pane.
pub fn header_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Spinner frames for the loading indicator.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current spinner frame for an animation counter.
pub fn spinner_frame(frame: u64) -> &'static str {
    SPINNER_FRAMES[(frame as usize) % SPINNER_FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names() {
        assert_eq!(color_from_name(Some("danger")), Color::Red);
        assert_eq!(color_from_name(Some("success")), Color::Green);
        assert_eq!(color_from_name(Some("no-such-color")), Color::White);
        assert_eq!(color_from_name(None), Color::White);
    }

    #[test]
    fn test_direction_colors() {
        assert_eq!(direction_color(Direction::ToServer), Color::Red);
        assert_eq!(direction_color(Direction::ToClient), Color::Green);
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), SPINNER_FRAMES[0]);
        assert_eq!(spinner_frame(SPINNER_FRAMES.len() as u64), SPINNER_FRAMES[0]);
    }
}
