//! # Transcript Entries
//!
//! A `Message` is one bubble in the conversation. Its body is either prose or
//! a set of structured recommendations, never both:
//!
//! ```text
//! Message
//! ├── sender: Sender            // User | Bot
//! ├── body: Body
//! │   ├── Text(String)          // user input, plain replies, error notices
//! │   └── Recommendations(..)   // title → RecommendationDetail, in payload order
//! └── created_at: DateTime<Local>
//! ```
//!
//! Messages are immutable once built. The store only ever appends them.

use chrono::{DateTime, Local};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One structured recommendation as delivered by the service, after validation.
///
/// Every field is optional on the wire; absent or malformed values are
/// replaced with `None`/empty so rendering never has to guess.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationDetail {
    /// Catalog identifier used to build the deep link.
    pub id: Option<String>,
    /// Cover art URL. May point nowhere.
    pub image: Option<String>,
    /// Plain-text description (markup already stripped).
    pub description: String,
    /// Per-title lookup failure reported by the service.
    pub error: Option<String>,
}

impl RecommendationDetail {
    /// Returns the cover URL only if it is an absolute http(s) URL.
    pub fn cover_url(&self) -> Option<&str> {
        let raw = self.image.as_deref()?;
        match reqwest::Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw),
            _ => None,
        }
    }

    /// Builds the catalog deep link, or `None` when there is no id to link to.
    pub fn catalog_link(&self, catalog_base_url: &str) -> Option<String> {
        let id = self.id.as_deref()?.trim();
        if id.is_empty() {
            return None;
        }
        Some(format!("{}/{}", catalog_base_url.trim_end_matches('/'), id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub detail: RecommendationDetail,
}

/// Recommendations in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations(pub Vec<Recommendation>);

impl Recommendations {
    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<&RecommendationDetail> {
        self.0
            .iter()
            .find(|rec| rec.title == title)
            .map(|rec| &rec.detail)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Recommendations(Recommendations),
}

#[derive(Debug, Clone)]
pub struct Message {
    pub sender: Sender,
    pub body: Body,
    pub created_at: DateTime<Local>,
}

impl Message {
    pub fn new(sender: Sender, body: Body) -> Self {
        Self {
            sender,
            body,
            created_at: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, Body::Text(text.into()))
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, Body::Text(text.into()))
    }

    pub fn bot_recommendations(recommendations: Recommendations) -> Self {
        Self::new(Sender::Bot, Body::Recommendations(recommendations))
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            Body::Recommendations(_) => None,
        }
    }

    pub fn recommendations(&self) -> Option<&Recommendations> {
        match &self.body {
            Body::Recommendations(recs) => Some(recs),
            Body::Text(_) => None,
        }
    }
}
