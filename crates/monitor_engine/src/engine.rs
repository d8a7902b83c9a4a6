use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_warn};

use crate::client::{ClientSettings, EventSink, JobApi, ReqwestJobClient};
use crate::{EngineError, EngineEvent, Poller};

enum EngineCommand {
    StartJob,
    BeginPolling { interval: Duration },
    StopPolling,
    Shutdown,
}

/// Runs requests and the status task on a tokio runtime owned by a worker
/// thread. Results are delivered to the `EventSink` given at construction.
///
/// Dropping the handle stops polling and shuts the runtime down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api: Arc<dyn JobApi> = Arc::new(ReqwestJobClient::new(settings)?);
        Self::with_api(api, sink)
    }

    pub fn with_api(api: Arc<dyn JobApi>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("monitor-engine".to_string())
            .spawn(move || run_worker(runtime, api, sink, cmd_rx))?;

        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    pub fn start_job(&self) {
        self.send(EngineCommand::StartJob);
    }

    pub fn begin_polling(&self, interval: Duration) {
        self.send(EngineCommand::BeginPolling { interval });
    }

    /// Idempotent.
    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            monitor_warn!("Engine worker is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
) {
    let mut poller = Poller::new();
    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartJob => {
                let api = api.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let result = api.start_job().await;
                    sink.emit(EngineEvent::StartCompleted(result));
                });
            }
            EngineCommand::BeginPolling { interval } => {
                poller.begin(runtime.handle(), interval, api.clone(), sink.clone());
            }
            EngineCommand::StopPolling => poller.stop(),
            EngineCommand::Shutdown => break,
        }
    }

    poller.stop();
    runtime.shutdown_background();
    monitor_debug!("Engine worker exited");
}
