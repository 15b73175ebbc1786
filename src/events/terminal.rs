use crate::state::State;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use log::*;
use std::{thread, time::Duration};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Specify terminal event poll rate in milliseconds.
///
const POLL_RATE_IN_MS: u64 = 50;

/// Specify different terminal event types.
///
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Input(KeyEvent),
    Resize(u16, u16),
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: UnboundedReceiver<Event>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread. The
    /// thread exits once the handler is dropped.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            let poll_rate = Duration::from_millis(POLL_RATE_IN_MS);
            while !tx.is_closed() {
                match event::poll(poll_rate) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        error!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Input(key)
                    }
                    Ok(CrosstermEvent::Resize(cols, rows)) => Event::Resize(cols, rows),
                    Ok(_) => continue,
                    Err(e) => {
                        error!("Failed to read terminal event: {}", e);
                        break;
                    }
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
            debug!("Terminal event thread exiting");
        });
        Handler { rx }
    }

    /// Wait for the next terminal event. Returns `None` once the polling
    /// thread has stopped.
    ///
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Apply a key press to the state.
///
pub fn handle_key(key: KeyEvent, state: &mut State) {
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        } => {
            debug!("Processing exit terminal event '{:?}'...", key);
            state.request_exit();
        }
        KeyEvent {
            code: KeyCode::Char('m'),
            ..
        } => {
            state.toggle_backdrop();
        }
        KeyEvent {
            code: KeyCode::Char('l'),
            ..
        } => {
            state.toggle_log();
        }
        _ => trace!("Ignoring key event '{:?}'", key),
    }
}
