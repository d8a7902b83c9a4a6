use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue `POST /start_scraping`.
    RequestStart,
    /// Start the repeating status task: one immediate fetch, then one per interval.
    BeginPolling { interval: Duration },
    /// Cancel the repeating status task. Idempotent.
    StopPolling,
}
