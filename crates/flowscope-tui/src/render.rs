//! Main render/view function (View in TEA pattern)
//!
//! A pure function from state to frame: every pane is redrawn from the
//! model after each batch of messages. The only state the view touches is
//! its own scroll bookkeeping (list scroll offset, detail scroll clamp).

use flowscope_app::AppState;
use ratatui::Frame;

use crate::{layout, widgets};

/// Render the complete UI.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let areas = layout::create(frame.area());
    let buf = frame.buffer_mut();
    widgets::filter_bar::render(buf, areas.filter_bar, state);
    widgets::flow_list::render(buf, areas.list, state);
    widgets::detail::render(buf, areas.detail, state);
    widgets::status_bar::render(buf, areas.status_bar, state);
}
