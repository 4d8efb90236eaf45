use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::message_list::LayoutCache;
use crate::tui::components::{MessageList, TitleBar};

/// Splits the screen into title bar, transcript and input box.
fn screen_layout(area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, input_area] = screen_layout(frame.area(), input_height);

    // Transcript first: it updates the unseen-content flag the title bar shows
    MessageList::new(
        &mut tui.message_list,
        app.store.messages(),
        &app.catalog_base_url,
        app.is_waiting,
        spinner_frame,
    )
    .render(frame, main_area);

    TitleBar::new(
        app.is_waiting,
        app.status_message.clone(),
        tui.message_list.has_unseen_below,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}

/// Hit test: which transcript entry (if any) is drawn at screen row `screen_y`.
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    layout: &LayoutCache,
    input_height: u16,
) -> Option<usize> {
    let [_, main_area, _] = screen_layout(frame_area, input_height);
    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    let content_y = (screen_y - main_area.y).saturating_add(scroll_offset_y);
    layout.entry_at(content_y)
}
