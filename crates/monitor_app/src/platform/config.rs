//! Monitor configuration, read from a RON file.
//!
//! Looks for `scrape_monitor.ron` in the working directory unless a path is
//! given as the first command-line argument. Every field is optional.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use monitor_core::{ControllerSettings, DEFAULT_IDLE_MESSAGE, DEFAULT_LOG_CAPACITY};
use monitor_engine::ClientSettings;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "scrape_monitor.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub log_capacity: usize,
    pub idle_message: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub log_file: PathBuf,
    pub log_to_terminal: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server_url: ClientSettings::default().base_url,
            poll_interval_ms: 2000,
            log_capacity: DEFAULT_LOG_CAPACITY,
            idle_message: DEFAULT_IDLE_MESSAGE.to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
            log_file: PathBuf::from("scrape_monitor.log"),
            log_to_terminal: false,
        }
    }
}

impl MonitorConfig {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            log_capacity: self.log_capacity,
            idle_message: self.idle_message.clone(),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            ..ClientSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_to_terminal {
            LogDestination::Both
        } else {
            LogDestination::File
        }
    }
}

pub(crate) fn config_path(arg: Option<OsString>) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn load_config(path: &Path) -> Result<Option<MonitorConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

/// Falls back to defaults on any error; the error is handed back so it can be
/// logged once logging is up.
pub(crate) fn load_or_default(path: &Path) -> (MonitorConfig, Option<ConfigError>) {
    match load_config(path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (MonitorConfig::default(), Some(err)),
    }
}
