/// One point-in-time status report from the server.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusSnapshot {
    pub running: bool,
    pub completed: bool,
    pub error: Option<String>,
    pub progress: f64,
    pub message: String,
    pub total_pins: u64,
    pub current_pin: u64,
    pub csv_file: Option<String>,
}

impl StatusSnapshot {
    /// The job error, if any. An empty string counts as no error.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|err| !err.is_empty())
    }

    /// The exported file token, if any. An empty string counts as absent.
    pub fn csv_file_name(&self) -> Option<&str> {
        self.csv_file.as_deref().filter(|name| !name.is_empty())
    }

    pub fn clamped_progress(&self) -> f64 {
        clamp_progress(self.progress)
    }
}

/// Clamps a reported progress value into `[0, 100]`. Non-finite values map to 0.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
