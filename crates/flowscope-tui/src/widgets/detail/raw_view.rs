//! Raw payload dual view
//!
//! Renders the ordered chunk sequence as direction-colored blocks. The text
//! and hex renderings are both derivable at all times; the visible one is
//! chosen by the active tab, toggled with the dedicated view key.

use flowscope_app::state::FlowDetailState;
use flowscope_app::{RawFocus, RawTab};
use flowscope_core::{hex_dump_chunk, highlight_payload};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::markup::markup_to_lines;
use crate::theme;

/// Build the raw payload section lines.
pub fn raw_section_lines(
    detail: &FlowDetailState,
    keywords: &[&str],
    search: Option<&str>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (text_tab, hex_tab) = match detail.raw_tab {
        RawTab::Text => ("[text]", " hex "),
        RawTab::Hex => (" text ", "[hex]"),
    };
    let mut header = vec![
        Span::styled("Raw payload  ", theme::header_style()),
        Span::styled(
            text_tab.to_string(),
            tab_style(detail.raw_tab == RawTab::Text),
        ),
        Span::raw(" "),
        Span::styled(
            hex_tab.to_string(),
            tab_style(detail.raw_tab == RawTab::Hex),
        ),
    ];
    if detail.last_raw_focus == RawFocus::Payload {
        header.push(Span::styled("  «v»", Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::from(header));

    if !detail.raw_loaded {
        lines.push(Line::from(Span::styled(
            if detail.raw_loading {
                "Loading…"
            } else {
                ""
            }
            .to_string(),
            theme::dim_style(),
        )));
        return lines;
    }

    for chunk in &detail.raw_chunks {
        let base = Style::default().fg(theme::direction_color(chunk.direction));
        match detail.raw_tab {
            RawTab::Text => {
                let text = String::from_utf8_lossy(&chunk.data);
                let markup = highlight_payload(&text, keywords, search);
                lines.extend(markup_to_lines(&markup, base, theme::mark_style()));
            }
            RawTab::Hex => {
                for dump_line in hex_dump_chunk(&chunk.data).lines() {
                    lines.push(Line::from(Span::styled(dump_line.to_string(), base)));
                }
            }
        }
    }
    lines
}

fn tab_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        theme::dim_style()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
