//! # Scroll Coordinator
//!
//! Keeps the newest transcript entry in view. It subscribes to the store
//! through a [`ChangeCursor`], so every append is noticed exactly once no
//! matter how many appends land between two frames.

use log::debug;

use crate::core::store::{ChangeCursor, MessageStore};
use crate::tui::components::MessageListState;

#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    cursor: ChangeCursor,
}

impl ScrollCoordinator {
    /// Starts at the store's current end; entries already present are laid
    /// out pinned to the bottom on the first frame anyway.
    pub fn new(store: &MessageStore) -> Self {
        Self {
            cursor: ChangeCursor::at_end(store),
        }
    }

    /// Returns true when entries were appended since the last call, in which
    /// case the list has been told to glide to the bottom.
    pub fn observe(&mut self, store: &MessageStore, list: &mut MessageListState) -> bool {
        match self.cursor.poll(store) {
            Some(fresh) => {
                debug!("Scroll coordinator: new entries {:?}", fresh);
                list.follow_latest();
                true
            }
            None => false,
        }
    }
}
