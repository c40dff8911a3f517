//! Highlight markup rendering
//!
//! The payload highlighter produces an escaped markup string with
//! `<mark>…</mark>` around matches. This module converts that string into
//! styled ratatui lines: marked regions get the highlight style, entities
//! decode back to displayable characters, and escaped control bytes render
//! as `.` so they can never corrupt the terminal.

use flowscope_core::{MARK_CLOSE, MARK_OPEN};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Convert a highlighter markup string into styled lines.
///
/// Nested marks count as one highlighted region. Newline and tab entities
/// restore line structure; every other escaped byte renders as `.`.
pub fn markup_to_lines(markup: &str, base: Style, mark: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut depth: usize = 0;
    let mut rest = markup;

    let flush = |spans: &mut Vec<Span<'static>>, text: &mut String, depth: usize| {
        if !text.is_empty() {
            let style = if depth > 0 { mark } else { base };
            spans.push(Span::styled(std::mem::take(text), style));
        }
    };

    while let Some(c) = rest.chars().next() {
        if rest.starts_with(MARK_OPEN) {
            flush(&mut spans, &mut text, depth);
            depth += 1;
            rest = &rest[MARK_OPEN.len()..];
            continue;
        }
        if rest.starts_with(MARK_CLOSE) {
            flush(&mut spans, &mut text, depth);
            depth = depth.saturating_sub(1);
            rest = &rest[MARK_CLOSE.len()..];
            continue;
        }
        let (decoded, consumed) = decode_entity(rest, c);
        match decoded {
            '\n' => {
                flush(&mut spans, &mut text, depth);
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            c => text.push(c),
        }
        rest = &rest[consumed..];
    }
    flush(&mut spans, &mut text, depth);
    if !spans.is_empty() || lines.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

/// Decode one character or entity at the head of `s`, whose first char is
/// `first`. Returns the displayable character and the bytes consumed.
fn decode_entity(s: &str, first: char) -> (char, usize) {
    if s.starts_with("&lt;") {
        return ('<', 4);
    }
    if s.starts_with("&gt;") {
        return ('>', 4);
    }
    if s.starts_with("&amp;") {
        return ('&', 5);
    }
    if let Some(body) = s.strip_prefix("&#x") {
        let digits: String = body.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
        if !digits.is_empty() && body[digits.len()..].starts_with(';') {
            let consumed = 3 + digits.len() + 1;
            let decoded = u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .map(displayable)
                .unwrap_or('.');
            return (decoded, consumed);
        }
    }
    (first, first.len_utf8())
}

/// Keep structural whitespace and printable characters; everything else
/// becomes a `.` placeholder.
fn displayable(c: char) -> char {
    match c {
        '\n' | '\t' => c,
        c if c.is_control() => '.',
        c => c,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
