use super::styling;
use super::Frame;
use crate::scene::Scene;
use crate::state::State;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const HINTS: &str = "q quit · m mount/unmount backdrop · l log";

/// Render the foreground card centered over the backdrop.
///
pub fn overlay(frame: &mut Frame, size: Rect, state: &State, scene: &Scene) {
    let mut lines = vec![
        Line::from(Span::styled(
            scene_headline(state, scene),
            styling::headline_style(),
        )),
        Line::from(""),
    ];
    lines.extend(field_summaries(scene).into_iter().map(|summary| {
        Line::from(Span::styled(summary, styling::normal_text_style()))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(HINTS, styling::muted_text_style())));

    let height = (lines.len() as u16 + 2).min(size.height);
    let width = lines
        .iter()
        .map(|l| l.width() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(size.width);
    let area = centered_rect(width, height, size);

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(styling::card_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::card_border_style()),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(card, area);
}

fn scene_headline(state: &State, scene: &Scene) -> String {
    let viewport = scene.viewport().size();
    if state.is_backdrop_mounted() {
        format!("{}  ({} px, frame {})", state.headline(), viewport, state.frame_count())
    } else {
        format!("{}  (backdrop unmounted)", state.headline())
    }
}

/// One line per particle field describing its live state.
///
pub fn field_summaries(scene: &Scene) -> Vec<String> {
    scene
        .fields()
        .iter()
        .enumerate()
        .map(|(i, renderer)| {
            format!(
                "field {}: {}/{} particles · {}",
                i + 1,
                renderer.particles().len(),
                renderer.options().particle_count,
                renderer.options().color
            )
        })
        .collect()
}

/// Return a `width` x `height` rect centered in `r`, clipped to it.
///
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
