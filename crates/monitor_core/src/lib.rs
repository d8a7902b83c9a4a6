//! Monitor core: pure job-controller state machine, UI reconciliation and log sink.
mod effect;
mod log_sink;
mod msg;
mod reconcile;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use log_sink::{LogBuffer, LogEntry, LogLevel, DEFAULT_LOG_CAPACITY};
pub use msg::{Key, Msg, StartReply};
pub use reconcile::bar_style;
pub use snapshot::{clamp_progress, StatusSnapshot};
pub use state::{AppState, Clock, ControllerSettings, JobPhase, DEFAULT_IDLE_MESSAGE};
pub use update::update;
pub use view_model::{
    AppViewModel, BarStyle, Panel, ProgressBarView, StartButtonView, StatsView,
    ESCAPE_HINT, PLACEHOLDER, START_LABEL_BUSY, START_LABEL_IDLE,
};
