use crate::{JobPhase, LogEntry};

pub const START_LABEL_IDLE: &str = "Start Scraping";
pub const START_LABEL_BUSY: &str = "Starting...";
/// Shown in a stat field whose value is zero or missing.
pub const PLACEHOLDER: &str = "-";
pub const ESCAPE_HINT: &str = "Stop the scraper from the server console to cancel the job";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStyle {
    /// Striped, animated: job in flight.
    #[default]
    Active,
    Success,
    Danger,
}

/// The three mutually exclusive content panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Progress,
    Results,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBarView {
    /// Always within `[0, 100]`.
    pub percent: f64,
    pub text: String,
    pub style: BarStyle,
}

impl Default for ProgressBarView {
    fn default() -> Self {
        Self {
            percent: 0.0,
            text: "0%".to_string(),
            style: BarStyle::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartButtonView {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for StartButtonView {
    fn default() -> Self {
        Self {
            enabled: true,
            label: START_LABEL_IDLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_pins: String,
    pub current_pin: String,
    pub status_text: String,
    pub status_message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub phase: JobPhase,
    pub start_button: StartButtonView,
    pub visible_panel: Option<Panel>,
    pub progress_bar: ProgressBarView,
    pub stats: StatsView,
    pub results_message: String,
    /// Server-relative link, e.g. `/download/out.csv`.
    pub download_href: Option<String>,
    pub error_message: String,
    pub log: Vec<LogEntry>,
    pub scroll_log_to_bottom: bool,
}

impl AppViewModel {
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible_panel == Some(panel)
    }
}
