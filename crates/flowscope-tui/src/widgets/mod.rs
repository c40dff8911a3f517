//! View widgets
//!
//! Every widget is a pure render function from state to buffer cells; no
//! widget mutates anything except its own scroll bookkeeping.

use unicode_width::UnicodeWidthStr;

pub mod detail;
pub mod filter_bar;
pub mod flow_list;
pub mod status_bar;

/// Terminal display width of a string (wide characters count as two cells).
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate `s` to at most `max` Unicode characters.
///
/// Uses `char_indices()` for Unicode-safe slicing so multi-byte characters
/// in addresses or filenames never split mid-character.
pub fn truncate_str(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate to `max` characters, appending `…` when truncated.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}…", truncate_str(s, max.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_ascii() {
        assert_eq!(truncate_str("hello", 3), "hel");
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_multibyte_safe() {
        assert_eq!(truncate_str("héllo", 2), "hé");
        assert_eq!(truncate_str("日本語テスト", 3), "日本語");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hell…");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
        assert_eq!(truncate_with_ellipsis("", 0), "");
    }

    #[test]
    fn test_display_width_counts_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }
}
