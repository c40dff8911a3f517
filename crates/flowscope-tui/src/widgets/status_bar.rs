//! # Status Bar Widget
//!
//! One line: key hints on the left, the shareable navigation query string
//! on the right (the bookmarkable form of what is currently displayed).

use flowscope_app::{AppState, InputMode};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::theme;
use crate::widgets::truncate_with_ellipsis;

const NORMAL_HINTS: &str =
    "q quit  ←/→ flow  ↑/↓ scroll  ⏎ open  v text/hex  / search  p proto  t tags  [/] history";
const SEARCH_HINTS: &str = "⏎ apply  esc cancel";
const TAG_HINTS: &str = "←/→ tag  space cycle  x require/deny  esc done";

/// Render the status bar.
pub fn render(buf: &mut Buffer, area: Rect, state: &AppState) {
    if area.height == 0 {
        return;
    }
    let hints = match state.input_mode {
        InputMode::Normal => NORMAL_HINTS,
        InputMode::Search { .. } => SEARCH_HINTS,
        InputMode::TagSelect { .. } => TAG_HINTS,
    };
    buf.set_string(
        area.x,
        area.y,
        truncate_with_ellipsis(hints, area.width as usize),
        theme::dim_style(),
    );

    let query = state.nav.current().encode();
    if !query.is_empty() {
        let display = truncate_with_ellipsis(&format!("?{query}"), 40);
        let width = display.chars().count() as u16;
        if width + 2 < area.width.saturating_sub(hints.chars().count() as u16) {
            buf.set_string(
                area.right() - width,
                area.y,
                &display,
                Style::default().fg(Color::Blue),
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
