use crate::{
    AppState, Effect, JobPhase, Key, LogLevel, Msg, Panel, StartReply, StatusSnapshot, ESCAPE_HINT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // A disabled or hidden button produces no click.
        Msg::StartClicked if !state.ui.start_button.enabled => Vec::new(),
        Msg::RetryClicked if state.ui.visible_panel != Some(Panel::Error) => Vec::new(),
        Msg::StartClicked | Msg::RetryClicked => start(&mut state),
        Msg::KeyPressed(Key::CtrlEnter) => {
            if state.is_running() {
                Vec::new()
            } else {
                start(&mut state)
            }
        }
        Msg::KeyPressed(Key::Escape) => {
            if state.is_running() {
                state.push_log(ESCAPE_HINT, LogLevel::Warning);
            }
            Vec::new()
        }
        Msg::StartResponded(Ok(StartReply::Accepted)) => {
            state.push_log("Scraper started successfully", LogLevel::Info);
            state.set_phase(JobPhase::Polling);
            vec![Effect::BeginPolling {
                interval: state.settings().poll_interval,
            }]
        }
        Msg::StartResponded(Ok(StartReply::Rejected(reason))) => {
            state.push_log(format!("Error starting scraper: {reason}"), LogLevel::Error);
            state.show_error(&reason);
            state.set_phase(JobPhase::Idle);
            Vec::new()
        }
        Msg::StartResponded(Err(err)) => {
            let message = format!("Failed to start scraper: {err}");
            state.push_log(message.clone(), LogLevel::Error);
            state.show_error(&message);
            state.set_phase(JobPhase::Idle);
            Vec::new()
        }
        Msg::StatusReceived(Ok(snapshot)) => apply_snapshot(&mut state, &snapshot),
        Msg::StatusReceived(Err(err)) => {
            // Transient: the status task keeps running.
            state.push_log(format!("Error checking status: {err}"), LogLevel::Error);
            Vec::new()
        }
        Msg::Disposed => {
            state.set_phase(JobPhase::Idle);
            vec![Effect::StopPolling]
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn start(state: &mut AppState) -> Vec<Effect> {
    if state.phase().is_active() {
        state.push_log("Scraping is already running", LogLevel::Warning);
        return Vec::new();
    }

    state.push_log("Starting scraping process...", LogLevel::Info);
    state.set_phase(JobPhase::Starting);
    state.show_starting();
    state.update_progress(0.0, "Initializing...");
    vec![Effect::RequestStart]
}

/// Snapshots are applied in arrival order with no sequencing guard, and the
/// completed branch is checked before the error branch.
fn apply_snapshot(state: &mut AppState, snapshot: &StatusSnapshot) -> Vec<Effect> {
    state.render_snapshot(snapshot);

    if !snapshot.running && snapshot.completed {
        state.set_phase(JobPhase::Completed);
        state.show_results(snapshot);
        state.push_log("Scraping completed successfully!", LogLevel::Success);
        return vec![Effect::StopPolling];
    }

    if !snapshot.running {
        if let Some(err) = snapshot.error_message() {
            state.set_phase(JobPhase::Failed);
            state.show_error(err);
            state.push_log(format!("Scraping failed: {err}"), LogLevel::Error);
            return vec![Effect::StopPolling];
        }
        return Vec::new();
    }

    state.update_progress(snapshot.progress, &snapshot.message);
    if snapshot.total_pins > 0 {
        state.push_log(
            format!(
                "Progress: {}/{} pins processed",
                snapshot.current_pin, snapshot.total_pins
            ),
            LogLevel::Info,
        );
    }
    Vec::new()
}
