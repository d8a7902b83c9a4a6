//! Snapshot → UI region mapping.
//!
//! Nothing here decides phase transitions; `update` does that and calls into
//! these helpers for the visible side of each transition.

use crate::view_model::{BarStyle, Panel, START_LABEL_BUSY, START_LABEL_IDLE};
use crate::{clamp_progress, AppState, LogLevel, StatusSnapshot, PLACEHOLDER};

/// Progress bar style for a given progress value and error presence.
/// Completion wins over an error.
pub fn bar_style(progress: f64, has_error: bool) -> BarStyle {
    if clamp_progress(progress) >= 100.0 {
        BarStyle::Success
    } else if has_error {
        BarStyle::Danger
    } else {
        BarStyle::Active
    }
}

fn count_or_placeholder(value: u64) -> String {
    if value == 0 {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

impl AppState {
    /// Writes every snapshot-derived field. Does not touch the log.
    pub(crate) fn render_snapshot(&mut self, snapshot: &StatusSnapshot) {
        let progress = snapshot.clamped_progress();
        let ui = &mut self.ui;
        ui.progress_bar.percent = progress;
        ui.progress_bar.text = format!("{progress}%");
        ui.progress_bar.style = bar_style(progress, snapshot.error_message().is_some());

        ui.stats.total_pins = count_or_placeholder(snapshot.total_pins);
        ui.stats.current_pin = count_or_placeholder(snapshot.current_pin);
        ui.stats.status_text = if snapshot.running { "Running" } else { "Stopped" }.to_string();
        ui.stats.status_message = if snapshot.message.is_empty() {
            "Ready".to_string()
        } else {
            snapshot.message.clone()
        };
        self.mark_dirty();
    }

    /// Sets bar and status message. Any non-empty message other than the idle
    /// one is logged, including one identical to the previous tick.
    pub(crate) fn update_progress(&mut self, progress: f64, message: &str) {
        let progress = clamp_progress(progress);
        self.ui.progress_bar.percent = progress;
        self.ui.progress_bar.text = format!("{progress}%");
        self.ui.stats.status_message = message.to_string();
        self.mark_dirty();

        if !message.is_empty() && message != self.settings().idle_message {
            self.push_log(message, LogLevel::Info);
        }
    }

    pub(crate) fn show_starting(&mut self) {
        self.ui.visible_panel = Some(Panel::Progress);
        self.ui.start_button.enabled = false;
        self.ui.start_button.label = START_LABEL_BUSY;
        self.mark_dirty();
    }

    pub(crate) fn show_results(&mut self, snapshot: &StatusSnapshot) {
        self.ui.visible_panel = Some(Panel::Results);
        self.ui.results_message = snapshot.message.clone();
        self.ui.download_href = snapshot
            .csv_file_name()
            .map(|name| format!("/download/{name}"));
        self.reset_start_button();
    }

    pub(crate) fn show_error(&mut self, message: &str) {
        self.ui.visible_panel = Some(Panel::Error);
        self.ui.error_message = message.to_string();
        self.reset_start_button();
    }

    fn reset_start_button(&mut self) {
        self.ui.start_button.enabled = true;
        self.ui.start_button.label = START_LABEL_IDLE;
        self.mark_dirty();
    }
}
