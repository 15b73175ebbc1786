//! Application state shared between the event handler and the renderer.

use crate::logger::LogBuffer;
use log::*;

/// Houses data representative of application state.
///
pub struct State {
    headline: String,
    running: bool,
    backdrop_mounted: bool,
    show_log: bool,
    frame_count: u64,
    log: LogBuffer,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            headline: String::new(),
            running: true,
            backdrop_mounted: true,
            show_log: false,
            frame_count: 0,
            log: LogBuffer::new(),
        }
    }
}

impl State {
    pub fn new(headline: &str, log: LogBuffer) -> Self {
        State {
            headline: headline.to_string(),
            log,
            ..State::default()
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the main loop to exit after the current iteration.
    ///
    pub fn request_exit(&mut self) -> &mut Self {
        debug!("Exit requested");
        self.running = false;
        self
    }

    /// Whether the backdrop renderers should be mounted.
    ///
    pub fn is_backdrop_mounted(&self) -> bool {
        self.backdrop_mounted
    }

    pub fn toggle_backdrop(&mut self) -> &mut Self {
        self.backdrop_mounted = !self.backdrop_mounted;
        info!(
            "Backdrop {}",
            if self.backdrop_mounted { "mounted" } else { "unmounted" }
        );
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.show_log
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.show_log = !self.show_log;
        self
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn advance_frame(&mut self) -> &mut Self {
        self.frame_count += 1;
        self
    }

    /// Return up to `count` of the most recent log lines.
    ///
    pub fn log_tail(&self, count: usize) -> Vec<String> {
        self.log.tail(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_exit() {
        let mut state = State::default();
        assert!(state.is_running());
        state.request_exit();
        assert!(!state.is_running());
    }

    #[test]
    fn toggle_backdrop() {
        let mut state = State::default();
        assert!(state.is_backdrop_mounted());
        state.toggle_backdrop();
        assert!(!state.is_backdrop_mounted());
        state.toggle_backdrop();
        assert!(state.is_backdrop_mounted());
    }

    #[test]
    fn toggle_log() {
        let mut state = State::default();
        assert!(!state.is_log_visible());
        state.toggle_log();
        assert!(state.is_log_visible());
    }

    #[test]
    fn log_tail_reads_shared_buffer() {
        let log = LogBuffer::new();
        let state = State::new("demo", log.clone());
        assert_eq!(state.headline(), "demo");
        log.push("hello".to_string());
        assert_eq!(state.log_tail(5), vec!["hello".to_string()]);
    }

    #[test]
    fn advance_frame() {
        let mut state = State::default();
        state.advance_frame().advance_frame();
        assert_eq!(state.frame_count(), 2);
    }
}
