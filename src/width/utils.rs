//! Terminal display width helpers.
//!
//! Generator output may carry ANSI escapes, tabs and wide glyphs. These
//! helpers turn one produced line into exactly `width` terminal cells.

use unicode_width::UnicodeWidthChar;

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Strip ANSI escapes and replace every whitespace character with a space.
pub fn normalize_line(text: &str) -> String {
    let clean = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&clean)
        .chars()
        .filter_map(|ch| {
            if ch.is_whitespace() {
                Some(' ')
            } else if ch.is_control() {
                None
            } else {
                Some(ch)
            }
        })
        .collect()
}

/// Longest prefix of `text` that fits in `width` cells.
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0usize;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// Left-justify `text` into exactly `width` cells, truncating or padding with spaces.
///
/// A wide glyph that would straddle the right edge is replaced by padding.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_escape_sequences() {
        assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
    }

    #[test]
    fn normalize_replaces_each_whitespace_char() {
        assert_eq!(normalize_line("a\tb\r\nc"), "a b  c");
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit_to_width("HELLO", 5), "HELLO");
        assert_eq!(fit_to_width("HI", 5), "HI   ");
        assert_eq!(fit_to_width("HELLO WORLD", 5), "HELLO");
        assert_eq!(fit_to_width("anything", 0), "");
    }

    #[test]
    fn truncate_keeps_prefix() {
        assert_eq!(truncate_to_width("HELLO WORLD", 5), "HELLO");
        assert_eq!(truncate_to_width("HI", 5), "HI");
        assert_eq!(truncate_to_width("日本", 3), "日");
    }

    #[test]
    fn fit_never_splits_wide_glyphs() {
        let fitted = fit_to_width("ab日本", 3);
        assert_eq!(fitted, "ab ");
        assert_eq!(display_width(&fitted), 3);
    }
}
