//! # Application State
//!
//! Core conversation state. No TUI types live here; presentation state
//! (scroll offsets, input cursor, focus) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── service: Arc<dyn RecommendationService>  // backend client
//! ├── store: MessageStore                      // transcript, append-only
//! ├── is_waiting: bool                         // a request is outstanding
//! ├── status_message: String                   // title bar text
//! ├── catalog_base_url: String                 // deep link prefix for cards
//! ├── max_query_chars: usize                   // outgoing query cap
//! └── next_turn: u64                           // id for the next request cycle
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::store::MessageStore;
use crate::recommend::RecommendationService;

pub const READY_STATUS: &str = "Ask me about anime!";

pub struct App {
    pub service: Arc<dyn RecommendationService>,
    pub store: MessageStore,
    pub is_waiting: bool,
    pub status_message: String,
    pub catalog_base_url: String,
    pub max_query_chars: usize,
    pub(crate) next_turn: u64,
}

impl App {
    pub fn new(service: Arc<dyn RecommendationService>) -> Self {
        Self::from_config(service, &ResolvedConfig::default())
    }

    pub fn from_config(service: Arc<dyn RecommendationService>, config: &ResolvedConfig) -> Self {
        let mut store = MessageStore::new();
        if let Some(greeting) = &config.greeting {
            store.append(Message::bot_text(greeting.clone()));
        }
        Self {
            service,
            store,
            is_waiting: false,
            status_message: String::from(READY_STATUS),
            catalog_base_url: config.catalog_base_url.clone(),
            max_query_chars: config.max_query_chars,
            next_turn: 1,
        }
    }
}
