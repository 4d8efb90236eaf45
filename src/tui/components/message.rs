use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::message::{Body, Message, Sender};
use crate::tui::components::recommendation_card::RecommendationCard;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;

pub const NO_MATCHES: &str = "No matching anime found.";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Wraps `text` to `width` columns and styles every resulting row.
///
/// The wrapping options match for every caller, so the number of rows this
/// returns is exactly the number of rows drawn.
pub fn wrap_styled(text: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::default()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let lines: Vec<Line<'static>> = textwrap::wrap(text, options)
        .into_iter()
        .map(|row| Line::from(Span::styled(row.into_owned(), style)))
        .collect();
    if lines.is_empty() {
        vec![Line::default()]
    } else {
        lines
    }
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Bot => Style::default().fg(Color::Blue),
    }
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "you",
        Sender::Bot => "elizabeth",
    }
}

/// A stateless component that renders one transcript entry.
///
/// Text entries draw their string as-is, only wrapped to the bubble width.
/// Recommendation entries draw one [`RecommendationCard`] per
/// recommendation, stacked in payload order.
///
/// Focus (mouse hover or keyboard cursor) highlights the border and expands
/// every card's synopsis.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub catalog_base_url: &'a str,
    pub is_focused: bool,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, catalog_base_url: &'a str, is_focused: bool) -> Self {
        Self {
            message,
            catalog_base_url,
            is_focused,
        }
    }

    fn cards(&self) -> impl Iterator<Item = RecommendationCard<'a>> + '_ {
        self.message
            .recommendations()
            .into_iter()
            .flat_map(|recs| recs.iter())
            .map(|rec| RecommendationCard::new(rec, self.catalog_base_url, self.is_focused))
    }

    /// Height this bubble needs at `width`, without rendering it.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding.
            return 1;
        }

        let body_height = match &self.message.body {
            Body::Text(text) => wrap_styled(text, content_width, Style::default()).len() as u16,
            Body::Recommendations(recs) if recs.is_empty() => 1,
            Body::Recommendations(_) => self
                .cards()
                .map(|card| card.calculate_height(content_width))
                .fold(0u16, u16::saturating_add),
        };
        body_height.saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = sender_style(self.message.sender);
        let border_style = if self.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let title = format!(
            "{} · {}",
            sender_label(self.message.sender),
            self.message.created_at.format("%H:%M")
        );
        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        match &self.message.body {
            Body::Text(text) => {
                Paragraph::new(wrap_styled(text, inner.width, style)).render(inner, buf);
            }
            Body::Recommendations(recs) if recs.is_empty() => {
                Paragraph::new(wrap_styled(NO_MATCHES, inner.width, style)).render(inner, buf);
            }
            Body::Recommendations(_) => {
                let mut y = inner.y;
                let bottom = inner.y.saturating_add(inner.height);
                for card in self.cards() {
                    if y >= bottom {
                        break;
                    }
                    let height = card.calculate_height(inner.width).min(bottom - y);
                    card.render(Rect::new(inner.x, y, inner.width, height), buf);
                    y = y.saturating_add(height);
                }
            }
        }
    }
}

/// Transient "Thinking..." bubble shown while a request is outstanding.
/// Not a transcript entry.
pub struct TypingIndicator {
    pub spinner_frame: usize,
}

impl TypingIndicator {
    pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = sender_style(Sender::Bot);
        let block = Block::bordered()
            .title(sender_label(Sender::Bot))
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);

        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(format!("{spinner} "), style.add_modifier(Modifier::BOLD)),
            Span::styled("Thinking...", style.add_modifier(Modifier::ITALIC)),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}
