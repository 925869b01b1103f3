//! Width-aware text helpers

use unicode_width::UnicodeWidthChar;

/// Truncate `text` to at most `max_width` terminal columns, appending an
/// ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            // Make room for the ellipsis.
            while !out.is_empty() && width + 1 > max_width {
                if let Some(last) = out.pop() {
                    width -= last.width().unwrap_or(0);
                }
            }
            out.push('…');
            return out;
        }
        width += ch_width;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        assert_eq!(truncate_to_width("Acme", 10), "Acme");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        assert_eq!(truncate_to_width("Acme Corporation", 8), "Acme Co…");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate_to_width("発注書テスト", 6), "発注…");
    }
}
