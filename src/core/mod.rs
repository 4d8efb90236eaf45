//! # Core Application Logic
//!
//! The conversation state machine. It knows nothing about any specific UI
//! technology and never touches the network.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (state)          │
//!                    │  • MessageStore         │
//!                    │  • Action / update()    │
//!                    │  • classify()           │
//!                    │                         │
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌─────────────┐
//!         │    TUI     │                  │  recommend  │
//!         │  Adapter   │                  │  (HTTP I/O) │
//!         │ (ratatui)  │                  │             │
//!         └────────────┘                  └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: transcript entries and recommendation records
//! - [`store`]: the append-only message store and its change cursors
//! - [`classify`]: turns a service payload into a bot message
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`state`]: the `App` struct
//! - [`config`]: layered configuration
//! - [`markup`]: description sanitizing

pub mod action;
pub mod classify;
pub mod config;
pub mod markup;
pub mod message;
pub mod state;
pub mod store;
