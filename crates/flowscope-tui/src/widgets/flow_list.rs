//! # Flow List Widget
//!
//! Renders the scrollable flow list: tick boundary markers, one two-line
//! entry per flow (destination and timing, then protocol and tag badges),
//! the selection highlight, and the trailing loading indicator row.

use flowscope_app::{AppState, Focus, ListRow};
use flowscope_core::{format_delay, format_time_ms, Flow, Tag};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::theme;
use crate::widgets::{truncate_str, truncate_with_ellipsis};

/// Lines one list row occupies.
fn row_height(row: &ListRow) -> u16 {
    match row {
        ListRow::Tick(_) => 1,
        ListRow::Flow(_) => 2,
    }
}

/// Render the flow list pane.
pub fn render(buf: &mut Buffer, area: Rect, state: &mut AppState) {
    if area.height < 2 || area.width < 4 {
        return;
    }

    // Title row.
    let focused = state.focus == Focus::List;
    let title_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        theme::dim_style().add_modifier(Modifier::BOLD)
    };
    buf.set_string(
        area.x,
        area.y,
        truncate_with_ellipsis(
            &format!("Flows ({})", state.list.flows.len()),
            area.width as usize,
        ),
        title_style,
    );

    let rows_area = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };

    // Reserve the last line for the loading indicator row while loading.
    let list_height = if state.list.loading {
        rows_area.height.saturating_sub(1)
    } else {
        rows_area.height
    };

    ensure_cursor_visible(state, list_height);

    let mut y = rows_area.y;
    let bottom = rows_area.y + list_height;
    for (row_index, row) in state
        .list
        .rows
        .iter()
        .enumerate()
        .skip(state.list.scroll_offset)
    {
        if y + row_height(row) > bottom {
            break;
        }
        match row {
            ListRow::Tick(tick) => {
                let label = format!("── Tick {tick} ──");
                let label_width = label.chars().count() as u16;
                let x = area.x + (area.width.saturating_sub(label_width)) / 2;
                buf.set_string(x, y, &label, theme::tick_marker_style());
                y += 1;
            }
            ListRow::Flow(i) => {
                if let Some(flow) = state.list.flows.get(*i) {
                    let selected = row_index == state.list.cursor;
                    render_flow_entry(
                        buf,
                        Rect {
                            y,
                            height: 2,
                            ..rows_area
                        },
                        flow,
                        &state.list.tag_catalogue,
                        selected,
                    );
                }
                y += 2;
            }
        }
    }

    if state.list.loading {
        let spinner = theme::spinner_frame(state.list.animation_frame);
        buf.set_string(
            rows_area.x + 1,
            rows_area.y + rows_area.height - 1,
            format!("{spinner} Loading…"),
            Style::default().fg(Color::Yellow),
        );
    }
}

/// Keep the cursor row inside the visible window.
fn ensure_cursor_visible(state: &mut AppState, height: u16) {
    let list = &mut state.list;
    if list.rows.is_empty() {
        list.scroll_offset = 0;
        return;
    }
    list.scroll_offset = list.scroll_offset.min(list.rows.len() - 1);
    if list.cursor < list.scroll_offset {
        list.scroll_offset = list.cursor;
    }
    // Scroll down until the cursor row's lines fit.
    loop {
        let used: u16 = list.rows[list.scroll_offset..=list.cursor.min(list.rows.len() - 1)]
            .iter()
            .map(row_height)
            .sum();
        if used <= height || list.scroll_offset >= list.cursor {
            break;
        }
        list.scroll_offset += 1;
    }
}

/// Render one flow entry: destination and timing on the first line,
/// protocol and tag badges on the second.
fn render_flow_entry(buf: &mut Buffer, area: Rect, flow: &Flow, catalogue: &[Tag], selected: bool) {
    let row_style = if selected {
        theme::selection_style()
    } else {
        Style::default()
    };
    for y in area.y..area.y + 2 {
        for x in area.x..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(row_style);
                cell.set_char(' ');
            }
        }
    }

    // Line 1: destination, right-aligned "delay, start time".
    let timing = format!(
        "{}, {}",
        format_delay(flow.duration_ms()),
        format_time_ms(flow.ts_start)
    );
    let timing_width = timing.len() as u16;
    let dest_width = area.width.saturating_sub(timing_width + 1) as usize;
    buf.set_string(
        area.x,
        area.y,
        truncate_with_ellipsis(&flow.dest_ipport, dest_width),
        Style::default().patch(row_style),
    );
    if timing_width < area.width {
        buf.set_string(
            area.right() - timing_width,
            area.y,
            &timing,
            theme::dim_style().patch(row_style),
        );
    }

    // Line 2: protocol badge, then catalogue-ordered tag badges.
    let mut x = area.x + 1;
    x = render_badge(
        buf,
        x,
        area.y + 1,
        area.right(),
        &flow.display_proto().to_uppercase(),
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .patch(row_style),
    );
    let flow_tags = flow.tag_names();
    for tag in catalogue {
        if flow_tags.contains(&tag.tag.as_str()) {
            let style = Style::default()
                .fg(Color::Black)
                .bg(theme::color_from_name(tag.color.as_deref()));
            x = render_badge(buf, x, area.y + 1, area.right(), &tag.tag, style);
        }
    }
}

/// Render one badge; returns the x position after it.
fn render_badge(buf: &mut Buffer, x: u16, y: u16, right: u16, text: &str, style: Style) -> u16 {
    let text = truncate_str(text, 20);
    let width = (crate::widgets::display_width(text) + 2) as u16;
    if x + width >= right {
        return x;
    }
    buf.set_string(x, y, format!(" {text} "), style);
    x + width + 1
}

// ── Tests ─────────────────────────────────────────────────────────────────────
