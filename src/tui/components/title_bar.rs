//! # TitleBar Component
//!
//! Single-line header:
//!
//! ```text
//! Elizabeth AI ● online | Ask me about anime! | ↓ New
//! Elizabeth AI ◌ thinking | Thinking...
//! ```
//!
//! Stateless. All three props come from different places: `is_waiting` and
//! `status_message` from the core `App`, `has_unseen_content` from the
//! message list's scroll state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const APP_TITLE: &str = "Elizabeth AI";

pub struct TitleBar {
    pub is_waiting: bool,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(is_waiting: bool, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            is_waiting,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'static> {
        let presence = if self.is_waiting {
            Span::styled(" ◌ thinking", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(" ● online", Style::default().fg(Color::Green))
        };

        let mut spans = vec![
            Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            presence,
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
