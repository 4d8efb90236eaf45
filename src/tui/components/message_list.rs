//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display transcript entries in order, plus the "Thinking..." indicator
//!   while a request is outstanding
//! - Scrolling, including the multi-frame glide to the newest entry
//! - Layout caching (per-entry heights) for hit testing and culling
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (layout cache, scroll offset) during the render pass, aligning with
//! Ratatui's `StatefulWidget` pattern. The transcript itself is borrowed
//! immutably and never changes here.
//!
//! ## Glide
//!
//! When the scroll coordinator reports a new entry it calls
//! [`MessageListState::follow_latest`]. Each following frame closes a third of
//! the remaining distance to the bottom (at least one row) until it lands:
//!
//! ```text
//! frame:     0    1    2    3   ...
//! offset:    0   26   44   56   ...  80
//! ```
//!
//! ## Scrollback window
//!
//! The canvas is a buffer addressed in `u16` rows, so only the newest entries
//! that fit in [`SCROLLBACK_ROWS`] are laid out. Older entries stay in the
//! store but drop out of the view; `LayoutCache::window_start` is the first
//! one shown.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{MessageBubble, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Canvas rows available to transcript entries and the typing indicator.
pub const SCROLLBACK_ROWS: u16 = 10_000;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, the view follows the bottom of the transcript
    pub stick_to_bottom: bool,
    /// Focused entry (hover or keyboard cursor). Its cards show their synopsis.
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Total canvas height from the last frame, indicator included
    pub content_height: u16,
    /// True when part of the transcript sits below the viewport
    pub has_unseen_below: bool,
    gliding: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            selected_index: None,
            viewport_height: 0,
            content_height: 0,
            has_unseen_below: false,
            gliding: false,
        }
    }

    /// Re-pin to the bottom and glide there over the next frames.
    pub fn follow_latest(&mut self) {
        self.stick_to_bottom = true;
        self.gliding = true;
    }

    /// Whether a glide is in progress (the event loop keeps redrawing until it lands).
    pub fn is_gliding(&self) -> bool {
        self.gliding
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected entry is fully visible.
    /// If the entry is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some((item_top, item_bottom)) = self
            .selected_index
            .and_then(|idx| self.layout.entry_span(idx))
        else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        self.gliding = false;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y.saturating_add(self.viewport_height) {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            // Re-pin if we've landed at the absolute bottom
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    /// Clamp scroll and re-engage follow mode if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Offset for this frame while pinned: glide one step, or sit at the bottom.
    fn pinned_offset(&mut self, max_y: u16) -> u16 {
        let current = self.scroll_state.offset().y.min(max_y);
        if !self.gliding || current >= max_y {
            self.gliding = false;
            return max_y;
        }
        let next = current + ((max_y - current) / 3).max(1);
        if next >= max_y {
            self.gliding = false;
        }
        next.min(max_y)
    }
}

/// Scrollable transcript view.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub catalog_base_url: &'a str,
    pub is_waiting: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        catalog_base_url: &'a str,
        is_waiting: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            catalog_base_url,
            is_waiting,
            spinner_frame,
        }
    }

    fn bubble(&self, index: usize) -> MessageBubble<'a> {
        let messages: &'a [Message] = self.messages;
        MessageBubble::new(
            &messages[index],
            self.catalog_base_url,
            self.state.selected_index == Some(index),
        )
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_items = self.messages.len();

        // 1. Update layout cache
        let reusable =
            self.state
                .layout
                .reusable_count(num_items, content_width, self.state.selected_index);
        self.state.layout.heights.truncate(reusable);
        for i in self.state.layout.heights.len()..num_items {
            let height = self.bubble(i).calculate_height(content_width);
            self.state.layout.heights.push(height);
        }
        self.state
            .layout
            .update_metadata(num_items, content_width, self.state.selected_index);

        let indicator_height = if self.is_waiting {
            TypingIndicator::HEIGHT
        } else {
            0
        };
        self.state
            .layout
            .rebuild_prefix_heights(SCROLLBACK_ROWS - indicator_height);
        let messages_height = self.state.layout.total_height();
        let canvas_height = messages_height.saturating_add(indicator_height);

        // 2. Settle the scroll offset for this frame
        self.state.viewport_height = area.height;
        self.state.content_height = canvas_height;
        if self.state.stick_to_bottom {
            let y = self.state.pinned_offset(self.state.max_offset());
            self.state.scroll_state.set_offset(Position { x: 0, y });
        } else {
            self.state.gliding = false;
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let Some((top, bottom)) = self.state.layout.entry_span(i) else {
                continue;
            };
            let rect = Rect::new(0, top, content_width, bottom - top);
            scroll_view.render_widget(self.bubble(i), rect);
        }

        if self.is_waiting {
            let rect = Rect::new(0, messages_height, content_width, indicator_height);
            scroll_view.render_widget(
                TypingIndicator {
                    spinner_frame: self.spinner_frame,
                },
                rect,
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let final_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_below = final_offset.saturating_add(area.height) < canvas_height;
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because scroll position outlives the per-frame component.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                self.gliding = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                self.gliding = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.follow_latest(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
#[derive(Default)]
pub struct LayoutCache {
    /// Height of every entry in the store
    pub heights: Vec<u16>,
    /// Running bottom edges of the entries from `window_start` on
    pub prefix_heights: Vec<u16>,
    window_start: usize,
    message_count: usize,
    content_width: u16,
    selected_index: Option<usize>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many cached heights are still valid.
    ///
    /// Entries never change once appended, so only a width change or a focus
    /// change (which expands or collapses cards) invalidates anything.
    pub fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        selected_index: Option<usize>,
    ) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }

        let cached = self.heights.len().min(message_count);
        if selected_index != self.selected_index {
            let earliest = [selected_index, self.selected_index]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(cached);
            return earliest.min(cached);
        }
        cached
    }

    pub fn update_metadata(
        &mut self,
        message_count: usize,
        content_width: u16,
        selected_index: Option<usize>,
    ) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.selected_index = selected_index;
    }

    /// Pick the scrollback window and rebuild its running heights.
    ///
    /// The window is the longest tail of entries whose heights add up to at
    /// most `budget` rows. The newest entry is always in it.
    pub fn rebuild_prefix_heights(&mut self, budget: u16) {
        let budget = u32::from(budget);
        let mut used = 0u32;
        let mut start = self.heights.len();
        while start > 0 {
            let next = used + u32::from(self.heights[start - 1]);
            if next > budget && start < self.heights.len() {
                break;
            }
            used = next;
            start -= 1;
        }
        self.window_start = start;

        self.prefix_heights = self.heights[start..]
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    /// First entry laid out in the canvas.
    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas rows `[top, bottom)` of entry `index`, if it is in the window.
    pub fn entry_span(&self, index: usize) -> Option<(u16, u16)> {
        let local = index.checked_sub(self.window_start)?;
        let bottom = *self.prefix_heights.get(local)?;
        let top = match local {
            0 => 0,
            _ => self.prefix_heights[local - 1],
        };
        Some((top, bottom))
    }

    /// Entry drawn at canvas row `content_y`.
    pub fn entry_at(&self, content_y: u16) -> Option<usize> {
        let local = self.prefix_heights.partition_point(|&end| end <= content_y);
        (local < self.prefix_heights.len()).then_some(self.window_start + local)
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        self.window_start + start..self.window_start + end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    const CATALOG: &str = "https://anilist.co/anime";

    fn transcript(n: usize) -> Vec<Message> {
        (0..n).map(|i| Message::user(format!("message {i}"))).collect()
    }

    fn draw(
        terminal: &mut Terminal<TestBackend>,
        state: &mut MessageListState,
        messages: &[Message],
        is_waiting: bool,
    ) -> Buffer {
        terminal
            .draw(|f| {
                MessageList::new(state, messages, CATALOG, is_waiting, 0).render(f, f.area());
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text_of(buffer: &Buffer) -> String {
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    // ==========================================================================
    // LayoutCache
    // ==========================================================================

    #[test]
    fn layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.update_metadata(5, 80, None);

        // Same everything
        assert_eq!(cache.reusable_count(5, 80, None), 5);
        // New entry appended: the old five stay valid
        assert_eq!(cache.reusable_count(6, 80, None), 5);
        // Width changed
        assert_eq!(cache.reusable_count(5, 40, None), 0);
        // Fewer entries than cached
        assert_eq!(cache.reusable_count(4, 80, None), 0);
    }

    #[test]
    fn focus_change_invalidates_from_earliest_index() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5];
        cache.update_metadata(5, 80, Some(3));

        assert_eq!(cache.reusable_count(5, 80, Some(1)), 1);
        assert_eq!(cache.reusable_count(5, 80, None), 3);
        assert_eq!(cache.reusable_count(5, 80, Some(3)), 5);
    }

    #[test]
    fn visible_range_culls_far_entries() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 100];
        cache.rebuild_prefix_heights(u16::MAX);
        assert_eq!(cache.total_height(), 300);
        assert_eq!(cache.window_start(), 0);

        let range = cache.visible_range(150, 10);
        assert!(range.start > 0);
        assert!(range.end < 100);
        assert!(range.contains(&50));
    }

    #[test]
    fn window_keeps_newest_entries_within_canvas() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 30_000];
        cache.rebuild_prefix_heights(9_997);

        // 9_997 / 3 = 3_332 entries fit
        let start = cache.window_start();
        assert_eq!(start, 30_000 - 3_332);
        assert_eq!(cache.prefix_heights.len(), 3_332);
        assert_eq!(cache.total_height(), 9_996);

        assert_eq!(cache.entry_span(start), Some((0, 3)));
        assert_eq!(cache.entry_span(start - 1), None);
        assert_eq!(cache.entry_at(4), Some(start + 1));
        assert_eq!(cache.entry_span(29_999).map(|(_, b)| b), Some(cache.total_height()));
    }

    #[test]
    fn oversized_last_entry_stays_in_window() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![5, u16::MAX];
        cache.rebuild_prefix_heights(SCROLLBACK_ROWS);
        assert_eq!(cache.window_start(), 1);
        assert_eq!(cache.entry_span(1), Some((0, u16::MAX)));
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn rendering_same_state_twice_is_identical() {
        let messages = transcript(4);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

        let first = draw(&mut terminal, &mut state, &messages, false);
        let second = draw(&mut terminal, &mut state, &messages, false);
        assert_eq!(first, second);
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn indicator_shown_only_while_waiting() {
        let messages = transcript(1);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

        let idle = text_of(&draw(&mut terminal, &mut state, &messages, false));
        assert!(!idle.contains("Thinking..."));

        let waiting = text_of(&draw(&mut terminal, &mut state, &messages, true));
        assert!(waiting.contains("Thinking..."));
        assert!(waiting.contains("message 0"));
    }

    #[test]
    fn pinned_list_shows_newest_entry() {
        let messages = transcript(30);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        let text = text_of(&draw(&mut terminal, &mut state, &messages, false));
        assert!(text.contains("message 29"));
        assert!(!text.contains("message 0 "));
        assert!(!state.has_unseen_below);
    }

    #[test]
    fn transcript_taller_than_canvas_still_shows_newest_entry() {
        // Two-line bubbles of height 4: 20,000 of them is 80,000 rows
        let messages: Vec<Message> = (0..20_000)
            .map(|i| Message::user(format!("line one\nmessage {i}")))
            .collect();
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        let text = text_of(&draw(&mut terminal, &mut state, &messages, false));
        assert!(text.contains("message 19999"));
        assert!(!state.has_unseen_below);
        assert!(state.layout.window_start() > 0);
        assert!(state.content_height <= SCROLLBACK_ROWS);

        let waiting = text_of(&draw(&mut terminal, &mut state, &messages, true));
        assert!(waiting.contains("Thinking..."));
    }

    #[test]
    fn follow_latest_glides_over_several_frames() {
        let messages = transcript(30);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        draw(&mut terminal, &mut state, &messages, false);
        let bottom = state.scroll_state.offset().y;
        assert!(bottom > 0);

        // User scrolled to the top
        state.scroll_state.set_offset(Position { x: 0, y: 0 });
        state.stick_to_bottom = false;
        draw(&mut terminal, &mut state, &messages, false);
        assert_eq!(state.scroll_state.offset().y, 0);
        assert!(state.has_unseen_below);

        state.follow_latest();
        draw(&mut terminal, &mut state, &messages, false);
        let step_one = state.scroll_state.offset().y;
        assert!(step_one > 0 && step_one < bottom, "first step {step_one}");
        assert!(state.is_gliding());

        let mut frames = 1;
        while state.is_gliding() {
            let before = state.scroll_state.offset().y;
            draw(&mut terminal, &mut state, &messages, false);
            assert!(state.scroll_state.offset().y > before);
            frames += 1;
            assert!(frames < 100, "glide never landed");
        }
        assert_eq!(state.scroll_state.offset().y, bottom);
        assert!(!state.has_unseen_below);
    }

    #[test]
    fn focused_entry_expands_its_cards() {
        let messages = vec![crate::core::classify::classify(serde_json::json!({
            "Bleach": {"id": "123", "description": "Soul reapers."}
        }))];
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        let collapsed = text_of(&draw(&mut terminal, &mut state, &messages, false));
        assert!(!collapsed.contains("Soul reapers."));

        state.selected_index = Some(0);
        let expanded = text_of(&draw(&mut terminal, &mut state, &messages, false));
        assert!(expanded.contains("Soul reapers."));
    }

    // ==========================================================================
    // Events
    // ==========================================================================

    #[test]
    fn scroll_up_unpins_and_scroll_to_bottom_repins() {
        let messages = transcript(30);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        draw(&mut terminal, &mut state, &messages, false);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
        assert!(state.is_gliding());
    }

    #[test]
    fn scroll_down_at_bottom_repins() {
        let messages = transcript(30);
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        draw(&mut terminal, &mut state, &messages, false);

        state.handle_event(&TuiEvent::ScrollUp);
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }
}
