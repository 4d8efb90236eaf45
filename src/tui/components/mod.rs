//! # TUI Components
//!
//! ## Stateless (props in, pixels out)
//!
//! - `TitleBar`: app name, online/thinking indicator, status, "↓ New"
//! - `MessageBubble`: one transcript entry
//! - `RecommendationCard`: one structured recommendation inside a bubble
//!
//! ## Stateful (event-driven)
//!
//! - `InputBox`: the draft editor
//! - `MessageList`: scrollable transcript with layout caching; its persistent
//!   half is `MessageListState`
//!
//! Components receive external data as props and never reach into the core
//! `App`. Each file carries its own state types, events and tests.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs              (bubble + typing indicator)
//! ├── recommendation_card.rs
//! ├── message_list.rs
//! └── input_box/              (editor, caret, wrapping)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod recommendation_card;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
