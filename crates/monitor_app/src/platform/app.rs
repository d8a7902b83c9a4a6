use std::process::ExitCode;
use std::sync::mpsc;

use monitor_core::{update, AppState, Msg};
use monitor_engine::{ClientSettings, EngineError};
use monitor_logging::{monitor_error, monitor_info, monitor_log, monitor_warn};
use thiserror::Error;

use super::config::{self, MonitorConfig};
use super::effects::EffectRunner;
use super::{input, logging, ui};

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AppEvent {
    /// Feed a message to the state machine.
    Dispatch(Msg),
    /// Move the log viewport; positive is towards older entries.
    ScrollLog(isize),
    /// Redraw unconditionally, e.g. after a resize.
    Redraw,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub fn run_app() -> ExitCode {
    let config_path = config::config_path(std::env::args_os().nth(1));
    let (config, config_error) = config::load_or_default(&config_path);
    logging::initialize(config.log_destination(), &config.log_file);
    if let Some(err) = config_error {
        monitor_warn!("Using default configuration: {}", err);
    }
    monitor_info!("scrape_monitor watching {}", config.server_url);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            monitor_error!("scrape_monitor failed: {}", err);
            eprintln!("scrape_monitor: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &MonitorConfig) -> Result<(), AppError> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let client_settings = config.client_settings();
    let runner = EffectRunner::new(client_settings.clone(), event_tx.clone())?;
    let mut screen = ui::terminal::Screen::enter()?;
    input::spawn_reader(event_tx);

    let mut controller = Controller::new(
        AppState::with_settings(config.controller_settings()),
        runner,
        client_settings,
    );
    controller.redraw(&mut screen)?;

    while let Ok(event) = event_rx.recv() {
        let mut force = false;
        let mut quit = false;
        // Coalesce whatever queued up behind this event into one redraw.
        for event in std::iter::once(event).chain(event_rx.try_iter()) {
            match event {
                AppEvent::Dispatch(msg) => {
                    quit |= msg == Msg::Disposed;
                    controller.dispatch(msg);
                }
                AppEvent::ScrollLog(delta) => {
                    controller.scroll_log(delta, screen.size().1);
                    force = true;
                }
                AppEvent::Redraw => force = true,
            }
            if quit {
                break;
            }
        }
        if quit {
            break;
        }
        if controller.take_dirty() || force {
            controller.redraw(&mut screen)?;
        }
    }

    monitor_info!("scrape_monitor exiting");
    Ok(())
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
    client_settings: ClientSettings,
    dirty: bool,
    log_offset: usize,
    mirrored_seq: u64,
}

impl Controller {
    fn new(state: AppState, runner: EffectRunner, client_settings: ClientSettings) -> Self {
        Self {
            state,
            runner,
            client_settings,
            dirty: false,
            log_offset: 0,
            mirrored_seq: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.dirty |= state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        self.mirror_log();
    }

    /// Copies log entries not yet seen to the log file.
    fn mirror_log(&mut self) {
        for entry in self.state.log_buffer().entries() {
            if entry.seq > self.mirrored_seq {
                monitor_log!(logging::facade_level(entry.level), "[ui] {}", entry.message);
                self.mirrored_seq = entry.seq;
            }
        }
    }

    fn scroll_log(&mut self, delta: isize, height: u16) {
        let max = ui::render::max_log_offset(self.state.log_buffer().len(), height);
        self.log_offset = self.log_offset.saturating_add_signed(delta).min(max);
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn redraw(&mut self, screen: &mut ui::terminal::Screen) -> std::io::Result<()> {
        if self.state.take_scroll_request() {
            self.log_offset = 0;
        }
        let view = self.state.view();
        let download_url = view
            .download_href
            .as_deref()
            .and_then(|href| self.client_settings.resolve(href).ok())
            .map(|url| url.to_string());

        let (width, height) = screen.size();
        let lines = ui::render::render(
            &view,
            &ui::render::RenderContext {
                server_url: &self.client_settings.base_url,
                download_url: download_url.as_deref(),
                width,
                height,
                log_offset: self.log_offset,
            },
        );
        screen.draw(&lines)
    }
}
