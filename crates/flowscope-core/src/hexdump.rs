//! # Hex Dump Rendering
//!
//! Pure transform from a byte sequence to the canonical `hexdump -C` style
//! text layout: an 8-hex-digit zero-padded offset, 16 space-separated
//! 2-hex-digit byte values with an extra space after the 8th, then a
//! `|....|` block rendering each byte as its printable ASCII character
//! (`.` outside `[0x20, 0x7F)`). The final partial line is blank-padded so
//! the ASCII block stays aligned.
//!
//! Two entry points: [`hex_dump_chunk`] renders one chunk of a sequence
//! (no trailer), [`hex_dump`] renders a single complete buffer and appends
//! the total length as a final offset line.

/// Bytes rendered per line.
const BYTES_PER_LINE: usize = 16;

/// Render one chunk of a longer sequence: no trailing length line, so
/// consecutive chunks concatenate into one continuous dump.
pub fn hex_dump_chunk(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);

    for (i, b) in bytes.iter().enumerate() {
        let col = i % BYTES_PER_LINE;
        if col == 0 {
            out.push_str(&format!("{i:08x}  "));
        }

        out.push_str(&format!("{b:02x} "));

        if col == BYTES_PER_LINE - 1 || i == bytes.len() - 1 {
            if col != BYTES_PER_LINE - 1 {
                // Pad the missing byte columns so the ASCII block aligns.
                out.push_str(&" ".repeat((BYTES_PER_LINE - 1 - col) * 3));
                if col < 8 {
                    out.push(' ');
                }
            }
            let line_start = (i / BYTES_PER_LINE) * BYTES_PER_LINE;
            let line = &bytes[line_start..(line_start + BYTES_PER_LINE).min(bytes.len())];
            out.push_str(" |");
            out.push_str(&ascii_repr(line));
            out.push_str("|\n");
        } else if col % 8 == 7 {
            out.push(' ');
        }
    }

    out
}

/// Render a single complete buffer in isolation: the chunk layout plus a
/// trailing line giving the total length as an 8-hex-digit offset.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = hex_dump_chunk(bytes);
    out.push_str(&format!("{:08x}\n", bytes.len()));
    out
}

/// ASCII block for one line: printable bytes as-is, everything else as `.`.
fn ascii_repr(slice: &[u8]) -> String {
    slice
        .iter()
        .map(|&b| {
            if (0x20..0x7f).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(hex_dump_chunk(&[]), "");
        // Standalone form still reports the total length.
        assert_eq!(hex_dump(&[]), "00000000\n");
    }

    #[test]
    fn test_full_line_layout() {
        let bytes = [0x41u8; 16];
        assert_eq!(
            hex_dump_chunk(&bytes),
            "00000000  41 41 41 41 41 41 41 41  41 41 41 41 41 41 41 41  |AAAAAAAAAAAAAAAA|\n"
        );
    }

    #[test]
    fn test_partial_line_padding_aligns_ascii_block() {
        // Three bytes: thirteen missing columns are blank-padded, plus the
        // mid-line gap since fewer than eight bytes were emitted.
        let dump = hex_dump_chunk(b"abc");
        assert_eq!(
            dump,
            "00000000  61 62 63                                          |abc|\n"
        );
        // The ASCII block starts at the same column as in a full line.
        let full = hex_dump_chunk(&[0x41u8; 16]);
        assert_eq!(dump.find('|'), full.find('|'));
    }

    #[test]
    fn test_partial_line_nine_bytes_no_extra_gap_pad() {
        // Nine bytes cross the mid-line boundary: the 8th-byte gap was
        // already emitted, so only the plain column padding is added.
        let dump = hex_dump_chunk(&[0x30u8; 9]);
        let full = hex_dump_chunk(&[0x30u8; 16]);
        assert_eq!(dump.find('|'), full.find('|'));
        assert!(dump.ends_with("|000000000|\n"));
    }

    #[test]
    fn test_nonprintable_bytes_render_as_dots() {
        let dump = hex_dump_chunk(&[0x00, 0x1f, 0x20, 0x7e, 0x7f, 0xff]);
        assert!(dump.ends_with("|.. ~..|\n"));
    }

    #[test]
    fn test_line_count_matches_ceil_div_16() {
        for len in 0..=64usize {
            let bytes = vec![0u8; len];
            let chunk_lines = hex_dump_chunk(&bytes).lines().count();
            assert_eq!(chunk_lines, len.div_ceil(16), "chunk line count, len={len}");
            let standalone_lines = hex_dump(&bytes).lines().count();
            assert_eq!(
                standalone_lines,
                len.div_ceil(16) + 1,
                "standalone line count, len={len}"
            );
        }
    }

    #[test]
    fn test_offsets_advance_by_sixteen() {
        let dump = hex_dump_chunk(&[0u8; 33]);
        let offsets: Vec<&str> = dump.lines().map(|l| &l[..8]).collect();
        assert_eq!(offsets, vec!["00000000", "00000010", "00000020"]);
    }

    #[test]
    fn test_trailer_is_total_length() {
        let dump = hex_dump(&[0u8; 300]);
        assert!(dump.ends_with("0000012c\n"));
    }

    #[test]
    fn test_hex_tokens_round_trip() {
        let bytes: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        let dump = hex_dump_chunk(&bytes);
        let decoded: Vec<u8> = dump
            .lines()
            .flat_map(|line| {
                // Strip the offset column and the ASCII block, keep hex tokens.
                let hex_part = &line[8..line.find('|').unwrap()];
                hex_part
                    .split_whitespace()
                    .map(|tok| u8::from_str_radix(tok, 16).unwrap())
                    .collect::<Vec<u8>>()
            })
            .collect();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_ascii_block_length_matches_byte_count() {
        for len in [1usize, 7, 8, 9, 15, 16, 17, 40] {
            let bytes = vec![b'x'; len];
            let dump = hex_dump_chunk(&bytes);
            let ascii_total: usize = dump
                .lines()
                .map(|line| {
                    let open = line.find('|').unwrap();
                    let close = line.rfind('|').unwrap();
                    close - open - 1
                })
                .sum();
            assert_eq!(ascii_total, len, "ascii length, len={len}");
        }
    }
}
