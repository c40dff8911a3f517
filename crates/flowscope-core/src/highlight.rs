//! # Payload Highlighting
//!
//! Pure transform producing markup-safe text with keyword and search-pattern
//! matches wrapped in `<mark>…</mark>` markers. Payload bytes are untrusted,
//! so the text is escaped first and every needle is escaped identically
//! before matching — a needle can therefore only ever match what the escaped
//! text actually displays.
//!
//! Escaping: characters inside printable low ASCII `[0x20, 0x7F)` pass
//! through, except `<`, `>` and `&` which become named entities; everything
//! else becomes a numeric `&#xNN;` entity. An `&` that already begins a
//! recognized entity is copied verbatim, which makes the escape idempotent.
//!
//! Wrapping: each keyword, then the active search pattern, is wrapped at
//! every literal non-overlapping occurrence, in that fixed order. A search
//! hit inside an already-wrapped keyword region nests a second marker.
//! Matching is literal substring only; there are no pattern semantics.

/// Opening highlight marker.
pub const MARK_OPEN: &str = "<mark>";
/// Closing highlight marker.
pub const MARK_CLOSE: &str = "</mark>";

/// Escape untrusted payload text into markup-safe form.
pub fn escape_payload(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match c {
            '&' => {
                if let Some(entity_len) = leading_entity_len(rest) {
                    out.push_str(&rest[..entity_len]);
                    rest = &rest[entity_len..];
                    continue;
                }
                out.push_str("&amp;");
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ' '..='~' => out.push(c),
            _ => out.push_str(&format!("&#x{:x};", c as u32)),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Length of a recognized entity at the start of `s`, if any.
fn leading_entity_len(s: &str) -> Option<usize> {
    for named in ["&lt;", "&gt;", "&amp;"] {
        if s.starts_with(named) {
            return Some(named.len());
        }
    }
    if let Some(body) = s.strip_prefix("&#x") {
        let digits = body.chars().take_while(|c| c.is_ascii_hexdigit()).count();
        if digits > 0 && body[digits..].starts_with(';') {
            return Some(3 + digits + 1);
        }
    }
    None
}

/// Escape `text` and wrap every literal occurrence of each keyword, then of
/// the active search pattern, in highlight markers.
pub fn highlight_payload(text: &str, keywords: &[&str], search: Option<&str>) -> String {
    let mut out = escape_payload(text);
    for keyword in keywords {
        out = wrap_matches(&out, &escape_payload(keyword));
    }
    if let Some(pattern) = search {
        out = wrap_matches(&out, &escape_payload(pattern));
    }
    out
}

/// Wrap every non-overlapping occurrence of `needle` found in the text runs
/// of `input` (marker tags are copied verbatim, matches never span them).
fn wrap_matches(input: &str, needle: &str) -> String {
    if needle.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        // Copy any marker tag unchanged so needles never match marker text.
        if rest.starts_with(MARK_OPEN) {
            out.push_str(MARK_OPEN);
            rest = &rest[MARK_OPEN.len()..];
            continue;
        }
        if rest.starts_with(MARK_CLOSE) {
            out.push_str(MARK_CLOSE);
            rest = &rest[MARK_CLOSE.len()..];
            continue;
        }
        if rest.starts_with(needle) {
            out.push_str(MARK_OPEN);
            out.push_str(needle);
            out.push_str(MARK_CLOSE);
            rest = &rest[needle.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
