//! Monitor engine: HTTP client for the scraping job endpoints and the
//! repeating status task.
mod client;
mod engine;
mod poller;
mod types;

pub use client::{ChannelEventSink, ClientSettings, EventSink, JobApi, ReqwestJobClient};
pub use engine::EngineHandle;
pub use poller::Poller;
pub use types::{ApiError, EngineError, EngineEvent, FailureKind, StartOutcome, StatusPayload};
