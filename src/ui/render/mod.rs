mod backdrop;
mod log;
mod overlay;

pub use backdrop::{pixel_size, Backdrop};

use self::log::log;
use super::widgets::styling;
use super::Frame;
use crate::scene::Scene;
use crate::state::State;
use overlay::overlay;
use ratatui::layout::{Constraint, Direction, Layout};

/// Render the backdrop, then the foreground content on top of it.
///
pub fn render(frame: &mut Frame, state: &State, scene: &Scene) {
    let size = frame.size();
    frame.render_widget(Backdrop::new(scene.layers(), styling::BACKGROUND), size);

    if state.is_log_visible() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)].as_ref())
            .split(size);
        overlay(frame, rows[0], state, scene);
        log(frame, rows[1], state);
    } else {
        overlay(frame, size, state, scene);
    }
}
