//! # Actions
//!
//! Everything that can happen in the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(draft)`.
//! Service answers? That's `Action::ResponseReceived { .. }`.
//!
//! `update()` applies an action to the state and returns an `Effect` telling
//! the event loop what I/O to perform next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! One request cycle:
//!
//! ```text
//! Submit(draft) ──► append user msg, is_waiting = true ──► Effect::SpawnRequest
//!                                                              │
//!         ResponseReceived ◄──────── service ok ───────────────┤
//!         RequestFailed    ◄──────── service error / task lost ┘
//!                │
//!                └─► append bot msg, is_waiting = false
//! ```

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::classify::classify;
use crate::core::message::Message;
use crate::core::state::{App, READY_STATUS};

/// Bot reply used whenever a request cycle fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub const WAITING_STATUS: &str = "Thinking...";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user sent a draft. Blank drafts are ignored.
    Submit(String),
    /// The service answered turn `turn` with this `recommendation` value.
    ResponseReceived { turn: u64, recommendation: Value },
    /// Turn `turn` failed before producing a payload.
    RequestFailed { turn: u64, error: String },
    Quit,
}

/// One outgoing request, owned by the task that performs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub turn: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SpawnRequest(TurnRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(draft) => submit(app, draft),
        Action::ResponseReceived {
            turn,
            recommendation,
        } => {
            let message = classify(recommendation);
            info!(
                "Turn {} answered ({})",
                turn,
                if message.recommendations().is_some() {
                    "structured"
                } else {
                    "plain"
                }
            );
            finish_turn(app, message);
            Effect::None
        }
        Action::RequestFailed { turn, error } => {
            warn!("Turn {} failed: {}", turn, error);
            finish_turn(app, Message::bot_text(ERROR_REPLY));
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, draft: String) -> Effect {
    let trimmed = draft.trim();
    if trimmed.is_empty() {
        debug!("Ignoring blank submission");
        return Effect::None;
    }

    let query = cap_chars(trimmed, app.max_query_chars);
    if query.len() < trimmed.len() {
        warn!(
            "Query truncated to {} characters before sending",
            app.max_query_chars
        );
    }

    let turn = app.next_turn;
    app.next_turn += 1;

    // The stored message keeps the draft exactly as typed.
    app.store.append(Message::user(draft));
    app.is_waiting = true;
    app.status_message = WAITING_STATUS.to_string();

    info!("Turn {} submitted ({} chars)", turn, query.chars().count());
    Effect::SpawnRequest(TurnRequest { turn, query })
}

fn finish_turn(app: &mut App, message: Message) {
    app.store.append(message);
    app.is_waiting = false;
    app.status_message = READY_STATUS.to_string();
}

fn cap_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use crate::test_support::test_app;
    use serde_json::json;

    fn spawned(effect: Effect) -> TurnRequest {
        match effect {
            Effect::SpawnRequest(req) => req,
            other => panic!("expected SpawnRequest, got {:?}", other),
        }
    }

    #[test]
    fn submit_appends_user_message_and_waits() {
        let mut app = test_app();
        let req = spawned(update(&mut app, Action::Submit("  recommend something  ".into())));

        assert_eq!(req.query, "recommend something");
        assert_eq!(app.store.len(), 1);
        let user = app.store.last().expect("user message");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text(), Some("  recommend something  "));
        assert!(app.is_waiting);
        assert_eq!(app.status_message, WAITING_STATUS);
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut app = test_app();
        for draft in ["", "   ", "\n\t "] {
            assert_eq!(update(&mut app, Action::Submit(draft.into())), Effect::None);
        }
        assert!(app.store.is_empty());
        assert!(!app.is_waiting);
    }

    #[test]
    fn response_appends_classified_bot_message() {
        let mut app = test_app();
        let req = spawned(update(&mut app, Action::Submit("hi".into())));

        let effect = update(
            &mut app,
            Action::ResponseReceived {
                turn: req.turn,
                recommendation: json!("Hello, ask me about anime!"),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.store.len(), 2);
        let bot = app.store.last().expect("bot message");
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text(), Some("Hello, ask me about anime!"));
        assert!(!app.is_waiting);
        assert_eq!(app.status_message, READY_STATUS);
    }

    #[test]
    fn failure_appends_error_reply_and_clears_waiting() {
        let mut app = test_app();
        let req = spawned(update(&mut app, Action::Submit("hi".into())));

        update(
            &mut app,
            Action::RequestFailed {
                turn: req.turn,
                error: "connection refused".into(),
            },
        );
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.messages()[0].text(), Some("hi"));
        assert_eq!(app.store.last().and_then(|m| m.text()), Some(ERROR_REPLY));
        assert!(!app.is_waiting);
    }

    #[test]
    fn turns_get_distinct_ids() {
        let mut app = test_app();
        let first = spawned(update(&mut app, Action::Submit("a".into())));
        let second = spawned(update(&mut app, Action::Submit("b".into())));
        assert_ne!(first.turn, second.turn);
    }

    #[test]
    fn overlapping_turns_each_append_one_reply() {
        let mut app = test_app();
        let first = spawned(update(&mut app, Action::Submit("a".into())));
        let second = spawned(update(&mut app, Action::Submit("b".into())));

        // Replies may arrive in any order; waiting is last-write-wins.
        update(
            &mut app,
            Action::ResponseReceived {
                turn: second.turn,
                recommendation: json!("for b"),
            },
        );
        update(
            &mut app,
            Action::RequestFailed {
                turn: first.turn,
                error: "timeout".into(),
            },
        );

        let texts: Vec<_> = app.store.messages().iter().filter_map(|m| m.text()).collect();
        assert_eq!(texts, vec!["a", "b", "for b", ERROR_REPLY]);
        assert!(!app.is_waiting);
    }

    #[test]
    fn long_query_is_capped_but_message_kept_whole() {
        let mut app = test_app();
        app.max_query_chars = 5;
        let req = spawned(update(&mut app, Action::Submit("héllo world".into())));
        assert_eq!(req.query, "héllo");
        assert_eq!(app.store.last().and_then(|m| m.text()), Some("héllo world"));
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
