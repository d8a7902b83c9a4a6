use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::view_model::{AppViewModel, Panel, ProgressBarView, StartButtonView, StatsView};
use crate::{LogBuffer, LogLevel, DEFAULT_LOG_CAPACITY, PLACEHOLDER};

pub const DEFAULT_IDLE_MESSAGE: &str = "Ready to start scraping";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    /// Start request in flight.
    Starting,
    /// Status task armed.
    Polling,
    Completed,
    Failed,
}

impl JobPhase {
    /// A start request would duplicate a job the client already knows about.
    pub fn is_active(self) -> bool {
        matches!(self, JobPhase::Starting | JobPhase::Polling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub poll_interval: Duration,
    pub log_capacity: usize,
    /// Status message the server reports while no job has run; never logged.
    pub idle_message: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            log_capacity: DEFAULT_LOG_CAPACITY,
            idle_message: DEFAULT_IDLE_MESSAGE.to_string(),
        }
    }
}

/// Source of log timestamps.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> String + Send + Sync>);

impl Clock {
    pub fn new(now: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(now))
    }

    /// Wall clock, local time, `HH:MM:SS`.
    pub fn local() -> Self {
        Self::new(|| chrono::Local::now().format("%H:%M:%S").to_string())
    }

    pub fn fixed(timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        Self::new(move || timestamp.clone())
    }

    pub fn now(&self) -> String {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock(..)")
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Mutable UI regions written by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UiRegions {
    pub(crate) start_button: StartButtonView,
    pub(crate) visible_panel: Option<Panel>,
    pub(crate) progress_bar: ProgressBarView,
    pub(crate) stats: StatsView,
    pub(crate) results_message: String,
    pub(crate) download_href: Option<String>,
    pub(crate) error_message: String,
}

impl UiRegions {
    fn new(idle_message: &str) -> Self {
        Self {
            start_button: StartButtonView::default(),
            visible_panel: None,
            progress_bar: ProgressBarView::default(),
            stats: StatsView {
                total_pins: PLACEHOLDER.to_string(),
                current_pin: PLACEHOLDER.to_string(),
                status_text: "Stopped".to_string(),
                status_message: idle_message.to_string(),
            },
            results_message: String::new(),
            download_href: None,
            error_message: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    settings: ControllerSettings,
    clock: Clock,
    phase: JobPhase,
    pub(crate) ui: UiRegions,
    log: LogBuffer,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(ControllerSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            ui: UiRegions::new(&settings.idle_message),
            log: LogBuffer::with_capacity(settings.log_capacity),
            settings,
            clock: Clock::default(),
            phase: JobPhase::Idle,
            dirty: false,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// True while the status task is armed.
    pub fn is_running(&self) -> bool {
        self.phase == JobPhase::Polling
    }

    pub fn log_buffer(&self) -> &LogBuffer {
        &self.log
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            start_button: self.ui.start_button.clone(),
            visible_panel: self.ui.visible_panel,
            progress_bar: self.ui.progress_bar.clone(),
            stats: self.ui.stats.clone(),
            results_message: self.ui.results_message.clone(),
            download_href: self.ui.download_href.clone(),
            error_message: self.ui.error_message.clone(),
            log: self.log.entries().cloned().collect(),
            scroll_log_to_bottom: self.log.scroll_requested(),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn take_scroll_request(&mut self) -> bool {
        self.log.take_scroll_request()
    }

    pub(crate) fn set_phase(&mut self, phase: JobPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.mark_dirty();
        }
    }

    pub(crate) fn push_log(&mut self, message: impl Into<String>, level: LogLevel) {
        let timestamp = self.clock.now();
        self.log.append(timestamp, message, level);
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
