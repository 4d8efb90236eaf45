use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that draws itself.
///
/// Components receive the data they show as props (struct fields), render
/// into a `Frame` within a given `Rect`, and may keep presentation caches
/// (layout heights, scroll offsets) in `&mut` state they borrow. They never
/// touch the conversation state.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component emits to its parent.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
