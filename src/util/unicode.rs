use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Terminal cells taken by `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to `max_cells` terminal cells, ending in `…` when shortened.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for grapheme in s.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if width + w > budget {
            break;
        }
        width += w;
        out.push_str(grapheme);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the `n`th grapheme (what a user counts as a character).
/// Past the end maps to `s.len()`.
pub fn grapheme_to_byte_offset(s: &str, n: usize) -> usize {
    s.grapheme_indices(true)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Number of graphemes before `byte_offset`.
pub fn byte_to_grapheme_offset(s: &str, byte_offset: usize) -> usize {
    let end = snap_to_grapheme_start(s, byte_offset);
    s[..end].graphemes(true).count()
}

/// Largest grapheme boundary at or before `byte_offset`, clamped to the text.
pub fn snap_to_grapheme_start(s: &str, byte_offset: usize) -> usize {
    if byte_offset >= s.len() {
        return s.len();
    }
    let mut last = 0;
    for (i, _) in s.grapheme_indices(true) {
        if i > byte_offset {
            break;
        }
        last = i;
    }
    last
}
