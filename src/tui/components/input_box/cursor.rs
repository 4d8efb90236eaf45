//! Caret tracking for the draft editor.
//!
//! `CursorState` owns the caret byte offset, the internal scroll offset and
//! the width seen on the last render. The text itself stays in `InputBox` and
//! is passed in explicitly.

use std::ops::Range;

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use super::text_wrap::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, display_width, inner_width, wrapped_rows,
};

pub(super) struct CursorState {
    /// Caret as a byte offset into the draft (0..=len, always a char boundary)
    pub pos: usize,
    /// First visible wrapped row (0 when the draft fits)
    pub scroll_offset: u16,
    /// Area width from the last render, used for vertical movement
    pub last_area_width: u16,
}

/// Index of the wrapped row holding `pos`: the last row starting at or before it.
fn row_of(rows: &[Range<usize>], pos: usize) -> usize {
    rows.partition_point(|row| row.start <= pos).saturating_sub(1)
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Column of the caret within its wrapped row, in terminal cells.
    fn column(&self, buffer: &str, row: &Range<usize>, width: u16) -> u16 {
        let end = self.pos.max(row.start);
        display_width(&buffer[row.start..end]).min(width)
    }

    /// Moves the caret one wrapped row up (`direction < 0`) or down, keeping
    /// its column where the target row is long enough.
    ///
    /// Returns `false` when already on the first/last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16, area_width: u16) -> bool {
        let width = inner_width(area_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let rows = wrapped_rows(buffer, width);
        let current = row_of(&rows, self.pos);
        let target = if direction < 0 {
            match current.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        } else if current + 1 < rows.len() {
            current + 1
        } else {
            return false;
        };

        let column = self.column(buffer, &rows[current], width);
        let target_row = &rows[target];
        let mut pos = target_row.start;
        let mut used = 0u16;
        for (i, c) in buffer[target_row.clone()].char_indices() {
            let w = c.width().unwrap_or(0) as u16;
            if used + w > column {
                break;
            }
            used += w;
            pos = target_row.start + i + c.len_utf8();
        }
        self.pos = pos;
        true
    }

    /// Wrapped row (0-based) the caret sits on.
    pub fn calculate_line(&self, buffer: &str, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        if width == 0 {
            return 0;
        }
        let rows = wrapped_rows(buffer, width);
        u16::try_from(row_of(&rows, self.pos)).unwrap_or(u16::MAX)
    }

    /// Keeps the caret's row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let width = inner_width(area_width);
        let total = u16::try_from(wrapped_rows(buffer, width).len()).unwrap_or(u16::MAX);
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let line = self.calculate_line(buffer, area_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line - (MAX_VISIBLE_LINES - 1);
        }
    }

    /// Screen cell (column, row) for the terminal cursor.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + 1, area.y + 1);
        }

        let rows = wrapped_rows(buffer, width);
        let index = row_of(&rows, self.pos);
        let column = self.column(buffer, &rows[index], width);
        let visible_row = u16::try_from(index)
            .unwrap_or(u16::MAX)
            .saturating_sub(self.scroll_offset);

        (
            area.x + CONTENT_OFFSET + column,
            area.y + 1 + visible_row,
        )
    }
}
