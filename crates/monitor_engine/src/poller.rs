use std::sync::Arc;
use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_info};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, JobApi};

/// Owns the repeating status task.
///
/// Each tick spawns an independent fetch, so a slow request never delays the
/// next one and several may be in flight at once. Results are emitted in
/// completion order. Stopping cancels the ticking, not the fetches already
/// in flight. Dropping the poller stops it.
#[derive(Debug, Default)]
pub struct Poller {
    token: Option<CancellationToken>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Fetches once immediately, then once per `interval`. A running task is
    /// replaced.
    pub fn begin(
        &mut self,
        runtime: &Handle,
        interval: Duration,
        api: Arc<dyn JobApi>,
        sink: Arc<dyn EventSink>,
    ) {
        self.stop();
        let token = CancellationToken::new();
        runtime.spawn(run_ticks(interval, api, sink, token.clone()));
        self.token = Some(token);
        monitor_info!("Status polling started, interval {:?}", interval);
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            monitor_info!("Status polling stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks(
    interval: Duration,
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) {
    // `interval` panics on zero; its first tick completes immediately.
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                tick += 1;
                monitor_debug!("Status tick {}", tick);
                let api = api.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result = api.fetch_status().await;
                    sink.emit(EngineEvent::StatusFetched(result));
                });
            }
        }
    }
}
