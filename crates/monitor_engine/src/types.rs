use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// `GET /status` body. Absent fields take their zero value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StatusPayload {
    pub running: bool,
    pub completed: bool,
    /// Any falsy JSON value decodes to `None`.
    #[serde(deserialize_with = "truthy_error")]
    pub error: Option<String>,
    pub progress: f64,
    pub message: Option<String>,
    pub total_pins: u64,
    pub current_pin: u64,
    pub csv_file: Option<String>,
}

/// `POST /start_scraping` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StartPayload {
    pub(crate) error: Option<serde_json::Value>,
}

impl StartPayload {
    /// A truthy `error` rejects the start, whatever the HTTP status was.
    pub(crate) fn into_outcome(self) -> StartOutcome {
        match self.error.and_then(error_text) {
            Some(reason) => StartOutcome::Rejected { reason },
            None => StartOutcome::Accepted,
        }
    }
}

fn truthy_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(error_text))
}

/// Text of a truthy `error` value; non-strings are shown as their JSON.
fn error_text(value: serde_json::Value) -> Option<String> {
    if !is_truthy(&value) {
        return None;
    }
    Some(match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    })
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Accepted,
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StartCompleted(Result<StartOutcome, ApiError>),
    StatusFetched(Result<StatusPayload, ApiError>),
}

/// A failed request. `message` is passed through to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    /// Reply body was not the expected JSON.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid reply"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
}
