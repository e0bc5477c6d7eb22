use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Splits `text` into rows of at most `width` terminal columns, breaking
/// between words where possible and inside words that are wider than a row.
pub fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_cols = 0usize;

        for word in paragraph.split(' ') {
            let word_cols = UnicodeWidthStr::width(word);
            if row_cols > 0 && row_cols + 1 + word_cols > width {
                rows.push(std::mem::take(&mut row));
                row_cols = 0;
            }
            if row_cols > 0 {
                row.push(' ');
                row_cols += 1;
            }
            for ch in word.chars() {
                let ch_cols = char_columns(ch);
                if row_cols > 0 && row_cols + ch_cols > width {
                    rows.push(std::mem::take(&mut row));
                    row_cols = 0;
                }
                row.push(ch);
                row_cols += ch_cols;
            }
        }

        rows.push(row);
    }

    rows
}

/// Shortens `text` to `max` terminal columns, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let budget = max - 1;
    let mut truncated = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_cols = char_columns(ch);
        if used + ch_cols > budget {
            break;
        }
        truncated.push(ch);
        used += ch_cols;
    }
    truncated.push('…');
    truncated
}

fn char_columns(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}
