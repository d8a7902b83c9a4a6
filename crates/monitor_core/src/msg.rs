use crate::StatusSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User clicked the start button.
    StartClicked,
    /// User clicked the retry button on the error panel.
    RetryClicked,
    /// Keyboard shortcut.
    KeyPressed(Key),
    /// Reply to the start request; `Err` carries a transport or decode failure.
    StartResponded(Result<StartReply, String>),
    /// Result of one status poll; `Err` is a transient fetch failure.
    StatusReceived(Result<StatusSnapshot, String>),
    /// Controller is being torn down.
    Disposed,
    /// UI/render tick to coalesce rendering.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartReply {
    Accepted,
    /// Server answered with an `error` field.
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    CtrlEnter,
    Escape,
}
