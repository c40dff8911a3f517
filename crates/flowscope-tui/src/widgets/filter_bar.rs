//! # Filter Bar Widget
//!
//! Two-line readout of the active filters. The first line shows the
//! protocol filter, time window, and free-text search (or the live search
//! input while it is being edited); the second line shows the tag catalogue
//! with each tag's tri-state filter marker.

use flowscope_app::{AppState, InputMode, TagFilter};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use flowscope_core::format_datetime_ms;

use crate::theme;
use crate::widgets::truncate_with_ellipsis;

/// Render the filter bar.
pub fn render(buf: &mut Buffer, area: Rect, state: &AppState) {
    if area.height == 0 || area.width < 4 {
        return;
    }
    render_filters_line(buf, Rect { height: 1, ..area }, state);
    if area.height > 1 {
        render_tags_line(
            buf,
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
            state,
        );
    }
}

fn render_filters_line(buf: &mut Buffer, area: Rect, state: &AppState) {
    // Live search input takes over the line while editing.
    if let InputMode::Search { buffer } = &state.input_mode {
        let prompt = format!("search> {buffer}█");
        buf.set_string(
            area.x,
            area.y,
            truncate_with_ellipsis(&prompt, area.width as usize),
            Style::default().fg(Color::Yellow),
        );
        return;
    }

    let params = state.nav.current();
    let mut parts: Vec<(String, bool)> = Vec::new();
    parts.push((
        format!(
            "proto: {}",
            params
                .app_proto
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| "all".to_string())
        ),
        params.app_proto.is_some(),
    ));
    parts.push((
        format!(
            "search: {}",
            params.search.as_deref().unwrap_or("-")
        ),
        params.search.is_some(),
    ));
    if let Some(to) = params.to {
        parts.push((format!("until {}", format_datetime_ms(to)), true));
    }
    if !params.services.is_empty() {
        parts.push((format!("services: {}", params.services.join(",")), true));
    }

    let mut x = area.x;
    for (i, (text, active)) in parts.iter().enumerate() {
        let style = if *active {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let rendered = if i == 0 {
            text.clone()
        } else {
            format!("  {text}")
        };
        if x >= area.right() {
            break;
        }
        let available = (area.right() - x) as usize;
        buf.set_string(x, area.y, truncate_with_ellipsis(&rendered, available), style);
        x += rendered.chars().count() as u16;
    }
}

fn render_tags_line(buf: &mut Buffer, area: Rect, state: &AppState) {
    let selected = match state.input_mode {
        InputMode::TagSelect { index } => Some(index),
        _ => None,
    };
    let params = state.nav.current();

    let mut x = area.x;
    buf.set_string(x, area.y, "tags:", theme::dim_style());
    x += 6;

    for (i, tag) in state.list.tag_catalogue.iter().enumerate() {
        let (marker, style) = match params.tag_filter(&tag.tag) {
            TagFilter::Required => ("+", Style::default().fg(Color::Green)),
            TagFilter::Denied => ("-", Style::default().fg(Color::Red)),
            TagFilter::Absent => (
                " ",
                Style::default().fg(theme::color_from_name(tag.color.as_deref())),
            ),
        };
        let text = if selected == Some(i) {
            format!("[{marker}{}]", tag.tag)
        } else {
            format!(" {marker}{} ", tag.tag)
        };
        let style = if selected == Some(i) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        let width = text.chars().count() as u16;
        if x + width >= area.right() {
            break;
        }
        buf.set_string(x, area.y, &text, style);
        x += width;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use flowscope_app::NavParams;
    use flowscope_core::{Tag, TickConfig};

    fn make_state() -> AppState {
        let mut state = AppState::new(TickConfig::new(1_700_000_000, 60), NavParams::default());
        state.list.tag_catalogue = vec![
            Tag {
                tag: "flag-out".to_string(),
                color: Some("danger".to_string()),
            },
            Tag {
                tag: "noise".to_string(),
                color: None,
            },
        ];
        state
    }

    fn render_to_text(state: &AppState, w: u16, h: u16) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        render(&mut buf, Rect::new(0, 0, w, h), state);
        let mut out = String::new();
        for y in 0..h {
            for x in 0..w {
                if let Some(c) = buf.cell((x, y)) {
                    out.push_str(c.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_default_filters_readout() {
        let state = make_state();
        let text = render_to_text(&state, 80, 2);
        assert!(text.contains("proto: all"));
        assert!(text.contains("search: -"));
        assert!(text.contains("flag-out"));
        assert!(text.contains("noise"));
    }

    #[test]
    fn test_active_protocol_filter_shown() {
        let mut state = make_state();
        state.nav.set_app_proto(Some("http".to_string()));
        let text = render_to_text(&state, 80, 2);
        assert!(text.contains("proto: HTTP"));
    }

    #[test]
    fn test_tag_markers_follow_tri_state() {
        let mut state = make_state();
        state.nav.toggle_tag("flag-out", false);
        state.nav.toggle_tag("noise", true);
        let text = render_to_text(&state, 80, 2);
        assert!(text.contains("+flag-out"), "required marker: {text}");
        assert!(text.contains("-noise"), "denied marker: {text}");
    }

    #[test]
    fn test_search_input_takes_over_line() {
        let mut state = make_state();
        state.input_mode = InputMode::Search {
            buffer: "FLAG{".to_string(),
        };
        let text = render_to_text(&state, 80, 2);
        assert!(text.contains("search> FLAG{"));
    }

    #[test]
    fn test_tag_select_brackets_current_tag() {
        let mut state = make_state();
        state.input_mode = InputMode::TagSelect { index: 1 };
        let text = render_to_text(&state, 80, 2);
        assert!(text.contains("[ noise]"), "selected tag brackets: {text}");
    }

    #[test]
    fn test_renders_on_tiny_area() {
        let state = make_state();
        render_to_text(&state, 3, 1);
    }
}
