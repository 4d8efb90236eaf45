//! # Response Classifier
//!
//! Decides what kind of bot message a service payload becomes.
//!
//! | `recommendation` value      | Result                                  |
//! |-----------------------------|-----------------------------------------|
//! | object                      | structured cards, one per key           |
//! | string                      | text, verbatim                          |
//! | null                        | text, [`EMPTY_REPLY`]                   |
//! | array / number / bool       | text, compact JSON of the value         |
//!
//! Every JSON value lands in exactly one row, so the controller never needs a
//! fallback after calling [`classify`].

use serde_json::{Map, Value};

use crate::core::markup;
use crate::core::message::{Message, Recommendation, RecommendationDetail, Recommendations};

/// Shown when the service answers with `"recommendation": null` (or omits it).
pub const EMPTY_REPLY: &str = "No recommendation was returned.";

/// Turns the `recommendation` field of a service response into a bot message.
pub fn classify(payload: Value) -> Message {
    match payload {
        Value::Object(entries) => Message::bot_recommendations(structured(entries)),
        Value::String(text) => Message::bot_text(text),
        Value::Null => Message::bot_text(EMPTY_REPLY),
        other => Message::bot_text(other.to_string()),
    }
}

fn structured(entries: Map<String, Value>) -> Recommendations {
    Recommendations(
        entries
            .into_iter()
            .map(|(title, raw)| Recommendation {
                title,
                detail: detail_from_value(&raw),
            })
            .collect(),
    )
}

/// Validates one detail record, substituting empty values for anything
/// missing or of the wrong type.
fn detail_from_value(raw: &Value) -> RecommendationDetail {
    let Value::Object(fields) = raw else {
        return RecommendationDetail::default();
    };

    let id = match fields.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    RecommendationDetail {
        id,
        image: string_field(fields, "image"),
        description: string_field(fields, "description")
            .map(|html| markup::to_plain_text(&html))
            .unwrap_or_default(),
        error: string_field(fields, "error"),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
