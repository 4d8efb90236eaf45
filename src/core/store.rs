//! # Message Store
//!
//! Append-only transcript. `append` is the only mutator, so an entry's index
//! never changes and observers can track progress with a plain counter.
//!
//! Observers subscribe by holding a [`ChangeCursor`]. Polling a cursor yields
//! the range of entries appended since that cursor last looked, exactly once:
//!
//! ```text
//! store:   [m0 m1 m2 m3 m4]
//! cursor:           ^ seen = 2
//! poll()  → Some(2..5), cursor.seen = 5
//! poll()  → None
//! ```

use std::ops::Range;

use crate::core::message::Message;

#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its index.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of appends so far. Equal to `len()` since nothing is ever removed.
    pub fn revision(&self) -> usize {
        self.messages.len()
    }
}

/// A subscriber's position in the store.
#[derive(Debug, Default, Clone)]
pub struct ChangeCursor {
    seen: usize,
}

impl ChangeCursor {
    /// A cursor that has seen nothing. The first poll reports every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor that starts at the store's current end.
    pub fn at_end(store: &MessageStore) -> Self {
        Self {
            seen: store.revision(),
        }
    }

    /// Returns the newly appended range, if any, and marks it as seen.
    pub fn poll(&mut self, store: &MessageStore) -> Option<Range<usize>> {
        let now = store.revision();
        if now <= self.seen {
            return None;
        }
        let fresh = self.seen..now;
        self.seen = now;
        Some(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_allows_duplicates() {
        let mut store = MessageStore::new();
        assert_eq!(store.append(Message::user("same")), 0);
        assert_eq!(store.append(Message::user("same")), 1);
        assert_eq!(store.append(Message::bot_text("reply")), 2);

        let texts: Vec<_> = store.messages().iter().filter_map(|m| m.text()).collect();
        assert_eq!(texts, vec!["same", "same", "reply"]);
        assert_eq!(store.last().and_then(|m| m.text()), Some("reply"));
    }

    #[test]
    fn cursor_reports_each_append_exactly_once() {
        let mut store = MessageStore::new();
        let mut cursor = ChangeCursor::new();
        assert_eq!(cursor.poll(&store), None);

        store.append(Message::user("a"));
        assert_eq!(cursor.poll(&store), Some(0..1));
        assert_eq!(cursor.poll(&store), None);

        store.append(Message::bot_text("b"));
        store.append(Message::user("c"));
        assert_eq!(cursor.poll(&store), Some(1..3));
        assert_eq!(cursor.poll(&store), None);
    }

    #[test]
    fn independent_cursors_do_not_steal_notifications() {
        let mut store = MessageStore::new();
        let mut redraw = ChangeCursor::new();
        let mut scroll = ChangeCursor::new();

        store.append(Message::user("a"));
        assert_eq!(redraw.poll(&store), Some(0..1));
        assert_eq!(scroll.poll(&store), Some(0..1));
    }

    #[test]
    fn cursor_at_end_skips_existing_entries() {
        let mut store = MessageStore::new();
        store.append(Message::bot_text("greeting"));
        let mut cursor = ChangeCursor::at_end(&store);
        assert_eq!(cursor.poll(&store), None);

        store.append(Message::user("hi"));
        assert_eq!(cursor.poll(&store), Some(1..2));
    }
}
