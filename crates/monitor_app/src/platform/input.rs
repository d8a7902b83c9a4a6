use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use monitor_core::{Key, Msg};
use monitor_logging::monitor_error;

use super::app::AppEvent;
use super::ui::constants::LOG_SCROLL_STEP;

/// Maps a key press to an app event. Ctrl+Enter is reported as Ctrl+J by many
/// terminals, so both are accepted.
pub(crate) fn map_key(key: &KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Enter if ctrl => AppEvent::Dispatch(Msg::KeyPressed(Key::CtrlEnter)),
        KeyCode::Char('j') if ctrl => AppEvent::Dispatch(Msg::KeyPressed(Key::CtrlEnter)),
        KeyCode::Char('c') if ctrl => AppEvent::Dispatch(Msg::Disposed),
        KeyCode::Esc => AppEvent::Dispatch(Msg::KeyPressed(Key::Escape)),
        KeyCode::Char('s') | KeyCode::Char('S') if !ctrl => AppEvent::Dispatch(Msg::StartClicked),
        KeyCode::Char('r') | KeyCode::Char('R') if !ctrl => AppEvent::Dispatch(Msg::RetryClicked),
        KeyCode::Char('q') | KeyCode::Char('Q') if !ctrl => AppEvent::Dispatch(Msg::Disposed),
        KeyCode::PageUp => AppEvent::ScrollLog(LOG_SCROLL_STEP as isize),
        KeyCode::PageDown => AppEvent::ScrollLog(-(LOG_SCROLL_STEP as isize)),
        KeyCode::End => AppEvent::ScrollLog(isize::MIN),
        _ => return None,
    };
    Some(event)
}

/// Reads terminal events until the receiving side goes away.
pub(crate) fn spawn_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let ready = match event::poll(Duration::from_millis(100)) {
            Ok(ready) => ready,
            Err(err) => {
                monitor_error!("Terminal input failed: {}", err);
                let _ = events.send(AppEvent::Dispatch(Msg::Disposed));
                return;
            }
        };
        if !ready {
            // Doubles as the render tick and detects a closed channel.
            if events.send(AppEvent::Dispatch(Msg::Tick)).is_err() {
                return;
            }
            continue;
        }
        let app_event = match event::read() {
            Ok(Event::Key(key)) => map_key(&key),
            Ok(Event::Resize(..)) => Some(AppEvent::Redraw),
            Ok(_) => None,
            Err(err) => {
                monitor_error!("Terminal input failed: {}", err);
                Some(AppEvent::Dispatch(Msg::Disposed))
            }
        };
        if let Some(app_event) = app_event {
            if events.send(app_event).is_err() {
                return;
            }
        }
    });
}
