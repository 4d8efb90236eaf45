//! # RecommendationCard Component
//!
//! One structured recommendation drawn as a small bordered card:
//!
//! ```text
//! ╭ Bleach ─────────────────────────────╮
//! │ ▣ http://x/y.jpg                    │   cover URL, or "▒ no image"
//! │ ↗ https://anilist.co/anime/123      │   catalog deep link
//! │ Ichigo Kurosaki is an ordinary...   │   synopsis, only when focused
//! ╰─────────────────────────────────────╯
//! ```
//!
//! The terminal can't show the cover itself, so the card shows where it lives.
//! A missing or non-http(s) URL gets the local placeholder instead.
//!
//! Content is pre-wrapped with `textwrap`, so `calculate_height` and
//! `render` always agree on the number of rows.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::message::Recommendation;
use crate::tui::components::message::wrap_styled;

/// Border (2) + padding (2) consumed horizontally.
pub const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders.
pub const VERTICAL_OVERHEAD: u16 = 2;

pub const NO_IMAGE: &str = "▒ no image";
pub const NO_LINK: &str = "↗ catalog link unavailable";
pub const SYNOPSIS_HINT: &str = "▸ hover or select to show the synopsis";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Clone, Copy)]
pub struct RecommendationCard<'a> {
    pub recommendation: &'a Recommendation,
    pub catalog_base_url: &'a str,
    /// Focused cards reveal their synopsis.
    pub expanded: bool,
}

impl<'a> RecommendationCard<'a> {
    pub fn new(recommendation: &'a Recommendation, catalog_base_url: &'a str, expanded: bool) -> Self {
        Self {
            recommendation,
            catalog_base_url,
            expanded,
        }
    }

    /// Wrapped content rows for a card of total width `width`.
    pub fn content_lines(&self, width: u16) -> Vec<Line<'static>> {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let detail = &self.recommendation.detail;
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        if let Some(error) = &detail.error {
            lines.extend(wrap_styled(
                &format!("⚠ {error}"),
                inner,
                Style::default().fg(Color::Red),
            ));
            return lines;
        }

        match detail.cover_url() {
            Some(url) => lines.extend(wrap_styled(
                &format!("▣ {url}"),
                inner,
                Style::default().fg(Color::Magenta),
            )),
            None => lines.extend(wrap_styled(NO_IMAGE, inner, dim)),
        }

        match detail.catalog_link(self.catalog_base_url) {
            Some(link) => lines.extend(wrap_styled(
                &format!("↗ {link}"),
                inner,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            )),
            None => lines.extend(wrap_styled(NO_LINK, inner, dim)),
        }

        if !self.expanded {
            lines.extend(wrap_styled(SYNOPSIS_HINT, inner, dim.add_modifier(Modifier::ITALIC)));
        } else if detail.description.is_empty() {
            lines.extend(wrap_styled(NO_DESCRIPTION, inner, dim));
        } else {
            lines.extend(wrap_styled(
                &detail.description,
                inner,
                Style::default().fg(Color::White),
            ));
        }

        lines
    }

    pub fn calculate_height(&self, width: u16) -> u16 {
        if width <= HORIZONTAL_OVERHEAD {
            return 1;
        }
        self.content_lines(width).len() as u16 + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for RecommendationCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let border_style = if self.expanded {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(self.recommendation.title.clone())
            .title_style(title_style)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        let lines = self.content_lines(area.width);
        block.render(area, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}
