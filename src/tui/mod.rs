//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates terminal events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loop
//!
//! Each iteration:
//! 1. Sync component props (`locked`, `dimmed`) from core state.
//! 2. Let the scroll coordinator look for new transcript entries.
//! 3. Draw if anything changed.
//! 4. Poll terminal events, draining everything pending before the next draw.
//! 5. Drain actions reported by request tasks and feed them to `update`.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request outstanding, or a scroll glide in progress): draws
//!   every ~50ms so the spinner turns and the glide moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod scroll;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::store::MessageStore;
use crate::recommend::dispatch::spawn_turn;
use crate::recommend::{HttpRecommendationService, RecommendationService};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::scroll::ScrollCoordinator;

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Up/Down focus transcript entries. Typing switches back to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core state)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    pub scroll: ScrollCoordinator,
}

impl TuiState {
    pub fn new(store: &MessageStore) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            scroll: ScrollCoordinator::new(store),
        }
    }

    /// Sync component props from core state. Called once per loop iteration.
    pub fn sync_props(&mut self, app: &App) {
        self.input_box.locked = app.is_waiting;
        self.input_box.dimmed = self.input_mode == InputMode::Cursor;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter; terminals
        // that don't support it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build the recommendation client from resolved settings.
pub fn build_service(config: &ResolvedConfig) -> Arc<dyn RecommendationService> {
    Arc::new(
        HttpRecommendationService::new(Some(config.service_base_url.clone()))
            .with_max_response_bytes(config.max_response_bytes),
    )
}

/// Feeds `action` to the reducer and carries out the effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnRequest(request) => {
            spawn_turn(app.service.clone(), request, tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

/// Routes one terminal event. Returns true when the app should quit.
fn handle_event(
    event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    frame_area: ratatui::layout::Rect,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        // Resize just needs a redraw (already flagged by the caller)
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, Action::Quit, tx),

        // Hover focuses the entry under the pointer, in either mode
        TuiEvent::MouseMove(_col, row) => {
            let input_height = tui.input_box.calculate_height(frame_area.width);
            tui.message_list.selected_index = ui::hit_test_message(
                row,
                frame_area,
                tui.message_list.scroll_state.offset().y,
                &tui.message_list.layout,
                input_height,
            );
            false
        }

        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            false
        }

        _ => match tui.input_mode {
            InputMode::Input => handle_input_mode(event, app, tui, tx),
            InputMode::Cursor => {
                handle_cursor_mode(event, app, tui);
                false
            }
        },
    }
}

fn handle_input_mode(
    event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    tx: &mpsc::Sender<Action>,
) -> bool {
    if event == TuiEvent::Escape {
        tui.input_mode = InputMode::Cursor;
        tui.message_list.selected_index = app.store.len().checked_sub(1);
        tui.message_list.scroll_to_selected();
        return false;
    }

    match tui.input_box.handle_event(&event) {
        Some(InputEvent::Submit(draft)) => dispatch(app, Action::Submit(draft), tx),
        Some(InputEvent::ContentChanged) | None => false,
    }
}

fn handle_cursor_mode(event: TuiEvent, app: &App, tui: &mut TuiState) {
    let count = app.store.len();
    match event {
        TuiEvent::Escape | TuiEvent::Submit => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
        }
        // Typing switches back to the editor and keeps the keystroke
        TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
            tui.input_box.handle_event(&event);
        }
        TuiEvent::CursorUp if count > 0 => {
            // Entries older than the scrollback window can't be brought into view
            let oldest = tui.message_list.layout.window_start();
            let idx = tui
                .message_list
                .selected_index
                .map_or(count - 1, |i| i.saturating_sub(1).max(oldest));
            tui.message_list.selected_index = Some(idx);
            tui.message_list.scroll_to_selected();
        }
        TuiEvent::CursorDown => {
            if let Some(idx) = tui.message_list.selected_index
                && idx + 1 < count
            {
                tui.message_list.selected_index = Some(idx + 1);
                tui.message_list.scroll_to_selected();
            }
        }
        _ => {}
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service = build_service(&config);
    info!(
        "Using recommendation service {} at {}",
        service.name(),
        config.service_base_url
    );
    let mut app = App::from_config(service, &config);
    let mut tui = TuiState::new(&app.store);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    // Request tasks report back through this channel
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync_props(&app);
        if tui.scroll.observe(&app.store, &mut tui.message_list) {
            needs_redraw = true;
        }

        let animating = app.is_waiting || tui.message_list.is_gliding();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let frame_area = terminal.get_frame().area();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &mut app, &mut tui, frame_area, &tx) {
                break 'main;
            }
            tui.sync_props(&app);
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx) {
                break 'main;
            }
        }
    }

    info!("Shutting down with {} transcript entries", app.store.len());
    ratatui::restore();
    Ok(())
}
