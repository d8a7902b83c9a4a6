use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use monitor_engine::{
    ApiError, EngineEvent, EventSink, JobApi, Poller, StartOutcome, StatusPayload,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Answers every status fetch with the same result and counts the calls.
struct ScriptedApi {
    result: Result<StatusPayload, ApiError>,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn repeating(result: Result<StatusPayload, ApiError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobApi for ScriptedApi {
    async fn start_job(&self) -> Result<StartOutcome, ApiError> {
        Ok(StartOutcome::Accepted)
    }

    async fn fetch_status(&self) -> Result<StatusPayload, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Never answers within a test's lifetime.
struct StalledApi {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl JobApi for StalledApi {
    async fn start_job(&self) -> Result<StartOutcome, ApiError> {
        Ok(StartOutcome::Accepted)
    }

    async fn fetch_status(&self) -> Result<StatusPayload, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(StatusPayload::default())
    }
}

struct TokioSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSink for TokioSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

fn running_payload() -> StatusPayload {
    StatusPayload {
        running: true,
        progress: 10.0,
        ..StatusPayload::default()
    }
}

fn sink() -> (Arc<TokioSink>, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(TokioSink { tx }), rx)
}

#[tokio::test]
async fn first_fetch_does_not_wait_for_the_interval() {
    let api = Arc::new(ScriptedApi::repeating(Ok(running_payload())));
    let (sink, mut rx) = sink();
    let mut poller = Poller::new();

    poller.begin(&Handle::current(), Duration::from_secs(30), api.clone(), sink);

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("immediate fetch")
        .expect("event");
    assert_eq!(event, EngineEvent::StatusFetched(Ok(running_payload())));
    assert_eq!(api.calls(), 1);
    poller.stop();
}

#[tokio::test]
async fn keeps_ticking_until_stopped() {
    let api = Arc::new(ScriptedApi::repeating(Ok(running_payload())));
    let (sink, mut rx) = sink();
    let mut poller = Poller::new();

    poller.begin(&Handle::current(), Duration::from_millis(20), api.clone(), sink);
    for _ in 0..3 {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick")
            .expect("event");
    }
    assert!(poller.is_active());

    poller.stop();
    poller.stop();
    assert!(!poller.is_active());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = api.calls();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(api.calls(), settled);
}

#[tokio::test]
async fn failures_do_not_stop_ticking() {
    let failure = Err(ApiError {
        kind: monitor_engine::FailureKind::Network,
        message: "connection refused".to_string(),
    });
    let api = Arc::new(ScriptedApi::repeating(failure.clone()));
    let (sink, mut rx) = sink();
    let mut poller = Poller::new();

    poller.begin(&Handle::current(), Duration::from_millis(20), api, sink);
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick")
            .expect("event");
        assert_eq!(event, EngineEvent::StatusFetched(failure.clone()));
    }
    poller.stop();
}

#[tokio::test]
async fn dropping_the_poller_stops_ticking() {
    let api = Arc::new(ScriptedApi::repeating(Ok(running_payload())));
    let (sink, mut rx) = sink();
    {
        let mut poller = Poller::new();
        poller.begin(&Handle::current(), Duration::from_millis(20), api.clone(), sink);
        rx.recv().await.expect("first event");
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = api.calls();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(api.calls(), settled);
}

#[tokio::test]
async fn slow_fetch_does_not_delay_next_tick() {
    let api = Arc::new(StalledApi {
        calls: AtomicUsize::new(0),
    });
    let (sink, mut rx) = sink();
    let mut poller = Poller::new();

    poller.begin(&Handle::current(), Duration::from_millis(20), api.clone(), sink);
    tokio::time::sleep(Duration::from_millis(150)).await;
    poller.stop();

    assert!(rx.try_recv().is_err(), "no fetch should have finished yet");
    assert!(
        api.calls.load(Ordering::SeqCst) >= 3,
        "ticks kept firing while the first fetch was pending: {}",
        api.calls.load(Ordering::SeqCst)
    );
}
