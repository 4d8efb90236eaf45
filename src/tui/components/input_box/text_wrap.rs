//! Wrapping and measuring helpers for the draft editor.
//!
//! Stateless; shared by `InputBox` (layout) and `CursorState` (navigation) so
//! both agree on where every wrapped row starts.

use std::ops::Range;

use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// The box grows up to this many rows, then scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to the first content cell (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Width left for text once borders and padding are taken. 0 if too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Byte ranges of the wrapped rows of `text`, in order.
///
/// Each logical line (split on `\n`) wraps on its own, so a trailing newline
/// yields a final empty row. Whitespace swallowed at a wrap point belongs to
/// no row. Never empty.
pub(super) fn wrapped_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    if width == 0 {
        return vec![0..text.len()];
    }

    let options = wrap_options(width);
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        let before = rows.len();
        let mut from = 0;
        for row in textwrap::wrap(line, &options) {
            let start = line[from..].find(row.as_ref()).map_or(from, |i| from + i);
            let end = start + row.len();
            rows.push(line_start + start..line_start + end);
            from = end;
        }
        if rows.len() == before {
            rows.push(line_start..line_start);
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Wrapped rows for `text`. Never less than one.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    u16::try_from(wrapped_rows(text, width).len()).unwrap_or(u16::MAX)
}

/// Terminal columns `text` occupies (wide glyphs count double).
pub(super) fn display_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
