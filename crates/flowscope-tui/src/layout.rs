//! Screen layout

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the flow list pane.
const LIST_WIDTH: u16 = 44;

/// Screen areas for the main view.
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Filter readout (protocol, search, time window, tags).
    pub filter_bar: Rect,
    /// Flow list pane.
    pub list: Rect,
    /// Flow detail pane.
    pub detail: Rect,
    /// Key hints and the shareable navigation string.
    pub status_bar: Rect,
}

/// Split the terminal area: filter bar on top, status bar at the bottom,
/// list beside detail in between.
pub fn create(area: Rect) -> ScreenAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LIST_WIDTH), Constraint::Min(20)])
        .split(vertical[1]);

    ScreenAreas {
        filter_bar: vertical[0],
        list: horizontal[0],
        detail: horizontal[1],
        status_bar: vertical[2],
    }
}
