use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `width` terminal cells.
pub fn truncate_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Pad `s` with trailing spaces to exactly `width` cells, truncating if needed.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let used = display_width(truncated);
    let mut out = String::with_capacity(truncated.len() + width - used);
    out.push_str(truncated);
    for _ in used..width {
        out.push(' ');
    }
    out
}

/// Center `s` within `width` cells, padding both sides with spaces.
pub fn center_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let used = display_width(truncated);
    if used >= width {
        return truncated.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    let mut out = String::with_capacity(truncated.len() + width - used);
    for _ in 0..left {
        out.push(' ');
    }
    out.push_str(truncated);
    for _ in 0..right {
        out.push(' ');
    }
    out
}
