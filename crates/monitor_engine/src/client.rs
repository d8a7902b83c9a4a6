use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::StartPayload;
use crate::{ApiError, EngineEvent, FailureKind, StartOutcome, StatusPayload};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server root, e.g. `http://127.0.0.1:5000`. Endpoint paths resolve under it.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a stalled request hang; the next poll tick fires regardless.
    pub request_timeout: Option<Duration>,
    pub start_path: String,
    pub status_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            start_path: "/start_scraping".to_string(),
            status_path: "/status".to_string(),
        }
    }
}

impl ClientSettings {
    /// Resolves a server-relative path (leading slash optional) under `base_url`,
    /// keeping any path prefix the base carries.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|base| base.join(path.trim_start_matches('/')))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{err}: {path}")))
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two calls the controller makes against the job server.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn start_job(&self) -> Result<StartOutcome, ApiError>;
    async fn fetch_status(&self) -> Result<StatusPayload, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    client: reqwest::Client,
    start_url: Url,
    status_url: Url,
}

impl ReqwestJobClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let start_url = settings.resolve(&settings.start_path)?;
        let status_url = settings.resolve(&settings.status_path)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            start_url,
            status_url,
        })
    }

    /// Reads the whole body and decodes it as JSON. The HTTP status is only
    /// used for the error message: the server reports failures in the body.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| {
            monitor_warn!("Undecodable reply (HTTP {}): {}", status.as_u16(), err);
            ApiError::new(
                FailureKind::Decode,
                format!("invalid JSON in reply (HTTP {}): {err}", status.as_u16()),
            )
        })
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobClient {
    async fn start_job(&self) -> Result<StartOutcome, ApiError> {
        monitor_debug!("POST {}", self.start_url);
        let response = self
            .client
            .post(self.start_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let payload: StartPayload = Self::read_json(response).await?;
        Ok(payload.into_outcome())
    }

    async fn fetch_status(&self) -> Result<StatusPayload, ApiError> {
        monitor_debug!("GET {}", self.status_url);
        let response = self
            .client
            .get(self.status_url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::read_json(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_base_path_prefix() {
        let settings = ClientSettings {
            base_url: "http://example.com/monitor".to_string(),
            ..ClientSettings::default()
        };
        assert_eq!(
            settings.resolve("/status").unwrap().as_str(),
            "http://example.com/monitor/status"
        );
        assert_eq!(
            settings.resolve("/download/out.csv").unwrap().as_str(),
            "http://example.com/monitor/download/out.csv"
        );
    }

    #[test]
    fn resolve_rejects_garbage_base() {
        let settings = ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        let err = settings.resolve("/status").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
