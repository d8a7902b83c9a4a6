use std::sync::{mpsc, Arc};

use monitor_core::{Effect, Msg, StartReply, StatusSnapshot};
use monitor_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink, StartOutcome,
    StatusPayload,
};
use monitor_logging::{monitor_info, monitor_warn};

use super::app::AppEvent;

/// Executes core effects on the engine; engine results come back as `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, events: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { events });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestStart => {
                    monitor_info!("RequestStart");
                    self.engine.start_job();
                }
                Effect::BeginPolling { interval } => {
                    monitor_info!("BeginPolling interval_ms={}", interval.as_millis());
                    self.engine.begin_polling(interval);
                }
                Effect::StopPolling => {
                    monitor_info!("StopPolling");
                    self.engine.stop_polling();
                }
            }
        }
    }
}

struct MsgSink {
    events: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(AppEvent::Dispatch(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartCompleted(result) => Msg::StartResponded(match result {
            Ok(StartOutcome::Accepted) => Ok(StartReply::Accepted),
            Ok(StartOutcome::Rejected { reason }) => Ok(StartReply::Rejected(reason)),
            Err(err) => {
                monitor_warn!("Start request failed ({}): {}", err.kind, err.message);
                Err(err.message)
            }
        }),
        EngineEvent::StatusFetched(result) => Msg::StatusReceived(match result {
            Ok(payload) => Ok(map_snapshot(payload)),
            Err(err) => {
                monitor_warn!("Status request failed ({}): {}", err.kind, err.message);
                Err(err.message)
            }
        }),
    }
}

fn map_snapshot(payload: StatusPayload) -> StatusSnapshot {
    StatusSnapshot {
        running: payload.running,
        completed: payload.completed,
        error: payload.error,
        progress: payload.progress,
        message: payload.message.unwrap_or_default(),
        total_pins: payload.total_pins,
        current_pin: payload.current_pin,
        csv_file: payload.csv_file,
    }
}
