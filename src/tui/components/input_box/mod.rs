//! # InputBox Component
//!
//! The draft editor at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input, including multi-line drafts and bracketed paste
//! - Editing (backspace, delete, caret movement)
//! - Submission (Enter), refused while `locked` or when the draft is blank
//! - Grow up to five rows, then scroll internally
//!
//! ## State Management
//!
//! The draft is internal state. `locked` (a request is outstanding) and
//! `dimmed` (cursor mode) are props set by the parent every frame. Caret and
//! scroll state live in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    wrap_line_count, wrapped_rows,
};

pub const PLACEHOLDER: &str = "Ask me about anime recommendations...";
pub const HINT: &str = "Enter to send, Shift+Enter for new line";
pub const TITLE: &str = "Message";
pub const LOCKED_TITLE: &str = "waiting for reply";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The draft was submitted and the editor cleared
    Submit(String),
    /// The draft or caret changed
    ContentChanged,
}

pub struct InputBox {
    /// Current draft (Internal State)
    pub buffer: String,
    /// A request is outstanding; submission is refused (Prop)
    pub locked: bool,
    /// Focus is on the transcript, not the editor (Prop)
    pub dimmed: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            locked: false,
            dimmed: false,
            cursor: CursorState::new(),
        }
    }

    /// Height for the current draft: between one and `MAX_VISIBLE_LINES` rows
    /// plus borders.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = wrap_line_count(&self.buffer, inner_width(area_width));
        rows.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn visible_lines(&self, area_width: u16) -> Vec<Line<'_>> {
        if self.buffer.is_empty() {
            let placeholder = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC);
            return vec![Line::styled(PLACEHOLDER, placeholder)];
        }

        let width = inner_width(area_width);
        if width == 0 {
            return Vec::new();
        }
        wrapped_rows(&self.buffer, width)
            .into_iter()
            .skip(self.cursor.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|row| Line::raw(&self.buffer[row]))
            .collect()
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = wrap_line_count(&self.buffer, inner_width(area.width));
        if total <= MAX_VISIBLE_LINES {
            return;
        }

        // content_length is the max scroll position, not the row count
        let mut state = ScrollbarState::default()
            .content_length(total.saturating_sub(MAX_VISIBLE_LINES) as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }

    fn take_draft(&mut self) -> String {
        self.cursor.reset();
        std::mem::take(&mut self.buffer)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_area_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let (title, border_style) = if self.locked {
            (LOCKED_TITLE, Style::default().add_modifier(Modifier::DIM))
        } else if self.dimmed {
            (TITLE, Style::default().add_modifier(Modifier::DIM))
        } else {
            (TITLE, Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::styled(HINT, Style::default().fg(Color::DarkGray)).right_aligned())
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(self.visible_lines(area.width))
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);
        self.render_scrollbar(frame, area);

        if !self.dimmed {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals may send CRLF inside a paste
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor.pos + i);
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            // Blank or locked: keep the draft exactly as typed
            TuiEvent::Submit if self.locked || self.buffer.trim().is_empty() => None,
            TuiEvent::Submit => Some(InputEvent::Submit(self.take_draft())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn render_to_string(input: &mut InputBox, width: u16) -> String {
        let height = input.calculate_height(width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = InputBox::new();
        type_text(&mut input, "ab");
        assert_eq!(input.buffer, "ab");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn submit_returns_untrimmed_draft_and_clears() {
        let mut input = InputBox::new();
        type_text(&mut input, "  recommend something like Naruto ");

        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit(
                "  recommend something like Naruto ".to_string()
            ))
        );
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn blank_submit_keeps_draft() {
        let mut input = InputBox::new();
        type_text(&mut input, "   ");

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ");
    }

    #[test]
    fn locked_submit_keeps_draft() {
        let mut input = InputBox::new();
        type_text(&mut input, "hi");
        input.locked = true;

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "hi");

        input.locked = false;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hi".to_string()))
        );
    }

    #[test]
    fn newline_and_paste_keep_line_breaks() {
        let mut input = InputBox::new();
        type_text(&mut input, "one");
        input.handle_event(&TuiEvent::InputChar('\n'));
        input.handle_event(&TuiEvent::Paste("two\r\nthree".into()));
        assert_eq!(input.buffer, "one\ntwo\nthree");
    }

    #[test]
    fn height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);

        input.handle_event(&TuiEvent::Paste("1\n2\n3".into()));
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);

        input.handle_event(&TuiEvent::Paste("\n4\n5\n6\n7\n8".into()));
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn home_and_end_stay_on_logical_line() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("first\nsecond".into()));

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(input.buffer, "first\n>second");

        input.handle_event(&TuiEvent::CursorUp);
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "first!\n>second");
    }

    #[test]
    fn empty_editor_shows_placeholder_and_hint() {
        let mut input = InputBox::new();
        let text = render_to_string(&mut input, 80);
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains(HINT));
        assert!(text.contains(TITLE));
    }

    #[test]
    fn locked_editor_says_waiting() {
        let mut input = InputBox::new();
        input.locked = true;
        let text = render_to_string(&mut input, 80);
        assert!(text.contains(LOCKED_TITLE));
    }

    #[test]
    fn draft_replaces_placeholder() {
        let mut input = InputBox::new();
        type_text(&mut input, "Naruto");
        let text = render_to_string(&mut input, 80);
        assert!(text.contains("Naruto"));
        assert!(!text.contains(PLACEHOLDER));
    }
}
