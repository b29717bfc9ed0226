//! Application state management for skycast
//!
//! This module contains the main application state: the city input line, the
//! forecast collection bound to the list, per-row icon state and the status
//! toast. It is the only place view state changes; background results arrive
//! as [`PipelineMessage`]s and are applied on the UI loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cache::Icon;
use crate::data::{ForecastCollection, ForecastDay};
use crate::pipeline::{ForecastPipeline, IconRequest, PipelineMessage};

/// How long a status message stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 5;

/// Icon state of one list row
#[derive(Debug, Clone)]
pub enum IconState {
    /// Download in progress
    Pending,
    /// Decoded icon ready to draw
    Ready(Arc<Icon>),
    /// Download failed or was refused; the row is drawn without an icon
    Unavailable,
}

/// Per-row view state, indexed by the row's position in the current forecast
#[derive(Debug, Clone)]
pub struct RowState {
    /// Stable identity of the row within the current forecast
    pub id: usize,
    /// Icon URL this row displays
    pub icon_url: String,
    pub icon: IconState,
}

/// A transient status message
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

/// Main application struct managing state and data
pub struct App {
    /// City name being typed
    pub input: String,
    /// Whether key presses edit the input line
    pub input_focused: bool,
    /// Forecast currently displayed
    pub forecast: ForecastCollection,
    /// Row state, one entry per forecast day, same order
    pub rows: Vec<RowState>,
    /// Index of the highlighted row
    pub selected_index: usize,
    /// A forecast request is in flight
    pub loading: bool,
    /// Status message, if one is showing
    pub toast: Option<Toast>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    pipeline: ForecastPipeline,
}

impl App {
    /// Creates a new App with an empty forecast and the input focused
    pub fn new(pipeline: ForecastPipeline) -> Self {
        Self {
            input: String::new(),
            input_focused: true,
            forecast: ForecastCollection::new(),
            rows: Vec::new(),
            selected_index: 0,
            loading: false,
            toast: None,
            should_quit: false,
            show_help: false,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &ForecastPipeline {
        &self.pipeline
    }

    /// Returns the highlighted forecast day, if any
    pub fn selected_day(&self) -> Option<&ForecastDay> {
        self.forecast.get(self.selected_index)
    }

    /// Requests the forecast for the city in the input line
    ///
    /// Invalid input is reported immediately and nothing is sent. On success
    /// the input loses focus, like a dismissed keyboard.
    pub fn submit(&mut self) {
        let city = self.input.clone();
        self.request_city(&city);
    }

    /// Requests the forecast for the city currently displayed again
    pub fn refresh(&mut self) {
        if let Some(city) = self.forecast.city().map(str::to_string) {
            self.request_city(&city);
        }
    }

    fn request_city(&mut self, city: &str) {
        match self.pipeline.request_forecast(city) {
            Ok(_) => {
                self.loading = true;
                self.input_focused = false;
            }
            Err(error) => {
                warn!(error = %error, "forecast request rejected");
                self.show_toast(error.user_message());
            }
        }
    }

    /// Shows a status message for [`TOAST_DURATION`]
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Called once per UI loop iteration: applies finished background work
    /// and expires the status message
    pub fn on_tick(&mut self) {
        while let Some(message) = self.pipeline.try_recv() {
            self.apply_message(message);
        }
        self.expire_toast(Instant::now());
    }

    /// Hides the status message once it has been visible long enough
    pub fn expire_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if now.saturating_duration_since(toast.shown_at) >= TOAST_DURATION {
                self.toast = None;
            }
        }
    }

    /// Applies one background result to view state
    pub fn apply_message(&mut self, message: PipelineMessage) {
        match message {
            PipelineMessage::ForecastLoaded {
                generation,
                city,
                days,
            } => {
                if self.is_superseded(generation) {
                    debug!(generation, "dropping superseded forecast");
                    return;
                }
                self.loading = false;
                self.forecast.replace(city, days);
                self.rebuild_rows();
                self.selected_index = 0;
            }
            PipelineMessage::ForecastFailed { generation, error } => {
                if self.is_superseded(generation) {
                    debug!(generation, "dropping superseded forecast failure");
                    return;
                }
                self.loading = false;
                self.show_toast(error.user_message());
            }
            PipelineMessage::IconLoaded { url } => {
                let Some(icon) = self.pipeline.icons().get(&url) else {
                    return;
                };
                for row in self.rows.iter_mut().filter(|row| row.icon_url == url) {
                    row.icon = IconState::Ready(Arc::clone(&icon));
                }
            }
            PipelineMessage::IconFailed { url } => {
                for row in self.rows.iter_mut().filter(|row| row.icon_url == url) {
                    if matches!(row.icon, IconState::Pending) {
                        row.icon = IconState::Unavailable;
                    }
                }
            }
        }
    }

    /// A result is superseded when a newer forecast request has been made
    fn is_superseded(&self, generation: u64) -> bool {
        generation < self.pipeline.latest_generation()
    }

    /// Recreates row state for the current forecast and binds icons
    fn rebuild_rows(&mut self) {
        let rows = self
            .forecast
            .days()
            .iter()
            .enumerate()
            .map(|(id, day)| RowState {
                id,
                icon_url: day.icon_url().to_string(),
                icon: match self.pipeline.request_icon(day.icon_url()) {
                    IconRequest::Ready(icon) => IconState::Ready(icon),
                    IconRequest::Pending => IconState::Pending,
                    IconRequest::Unavailable => IconState::Unavailable,
                },
            })
            .collect();
        self.rows = rows;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Ctrl-C`: Quit from anywhere
    /// - `F1`: Toggle help
    /// - Input focused: characters edit the city, `Backspace` deletes,
    ///   `Enter` fetches, `Esc`/`Tab` leave the input
    /// - List focused: `Up`/`k`, `Down`/`j`, `PageUp`, `PageDown`, `Home`/`g`,
    ///   `End`/`G` move the selection; `/`, `i` or `Tab` edit the city;
    ///   `r` refreshes; `?` toggles help; `q`/`Esc` quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if key_event.code == KeyCode::F(1) {
            self.show_help = true;
            return;
        }

        if self.input_focused {
            self.handle_input_key(key_event);
        } else {
            self.handle_list_key(key_event);
        }
    }

    fn handle_input_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc | KeyCode::Tab => {
                self.input_focused = false;
            }
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Char(c)
                if (KeyModifiers::NONE | KeyModifiers::SHIFT).contains(key_event.modifiers) =>
            {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::PageUp => {
                self.selected_index = self.selected_index.saturating_sub(PAGE_SIZE);
            }
            KeyCode::PageDown => {
                let last = self.forecast.len().saturating_sub(1);
                self.selected_index = (self.selected_index + PAGE_SIZE).min(last);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected_index = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected_index = self.forecast.len().saturating_sub(1);
            }
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Tab => {
                self.input_focused = true;
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.forecast.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.forecast.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Stops the pipeline from accepting new work
    pub fn shutdown(&self) {
        self.pipeline.shutdown();
    }
}
