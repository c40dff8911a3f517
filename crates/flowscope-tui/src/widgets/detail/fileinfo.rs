//! Extracted-file cards
//!
//! Each extracted file renders as a card attached to its transaction:
//! a header with the filename and type sniff, the content-addressed
//! storage path with the suggested download name, and a body chosen by
//! the render strategy (image/document metadata with a hex preview,
//! decoded text, or the binary dual text/hex view).

use flowscope_app::state::FileView;
use flowscope_app::RawTab;
use flowscope_core::{hex_dump, highlight_payload, FileRenderKind, Fileinfo};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::markup::markup_to_lines;
use crate::theme;

/// Hex lines shown for image/document previews before truncating.
const PREVIEW_HEX_LINES: usize = 8;

/// Build the card lines for one extracted file.
pub fn file_card_lines(
    info: &Fileinfo,
    view: &FileView,
    keywords: &[&str],
    search: Option<&str>,
    focused: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Header: title, dual-view indicator, toggle-focus marker.
    let mut header = vec![Span::styled(
        format!("▸ {}", info.display_title()),
        Style::default().fg(Color::Yellow),
    )];
    if view.kind == FileRenderKind::Binary {
        let tab = match view.tab {
            RawTab::Text => "[text]",
            RawTab::Hex => "[hex]",
        };
        header.push(Span::styled(format!("  {tab}"), theme::dim_style()));
    }
    if focused {
        header.push(Span::styled("  «v»", Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::from(header));

    // Content address and suggested download name.
    lines.push(Line::from(Span::styled(
        format!(
            "  filestore/{} → {}",
            info.storage_path(),
            info.download_name(view.ext)
        ),
        theme::dim_style(),
    )));

    let Some(bytes) = &view.bytes else {
        lines.push(Line::from(Span::styled(
            if view.failed { "  ?" } else { "  Loading…" }.to_string(),
            theme::dim_style(),
        )));
        return lines;
    };

    match view.kind {
        FileRenderKind::Image | FileRenderKind::Document => {
            lines.push(Line::from(Span::styled(
                format!("  [{} data, {} bytes]", view.ext, bytes.len()),
                Style::default().fg(Color::Cyan),
            )));
            let dump = hex_dump(bytes);
            for (i, dump_line) in dump.lines().enumerate() {
                if i >= PREVIEW_HEX_LINES {
                    lines.push(Line::from(Span::styled("  …".to_string(), theme::dim_style())));
                    break;
                }
                lines.push(Line::from(Span::styled(
                    format!("  {dump_line}"),
                    theme::dim_style(),
                )));
            }
        }
        FileRenderKind::Text => {
            lines.extend(text_body_lines(bytes, keywords, search));
        }
        FileRenderKind::Binary => match view.tab {
            RawTab::Text => lines.extend(text_body_lines(bytes, keywords, search)),
            RawTab::Hex => {
                for dump_line in hex_dump(bytes).lines() {
                    lines.push(Line::from(Span::raw(format!("  {dump_line}"))));
                }
            }
        },
    }
    lines
}

/// Decoded, highlighted text body, indented under the card header.
fn text_body_lines(bytes: &[u8], keywords: &[&str], search: Option<&str>) -> Vec<Line<'static>> {
    let text = String::from_utf8_lossy(bytes);
    let markup = highlight_payload(&text, keywords, search);
    markup_to_lines(&markup, Style::default(), theme::mark_style())
        .into_iter()
        .map(indent_line)
        .collect()
}

fn indent_line(line: Line<'static>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    spans.extend(line.spans);
    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
