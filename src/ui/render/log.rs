use super::styling;
use super::Frame;
use crate::state::State;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
};

/// Render log widget according to state.
///
pub fn log(frame: &mut Frame, size: Rect, state: &State) {
    let block = Block::default()
        .title("Log (press l to hide)")
        .borders(Borders::ALL)
        .border_style(styling::card_border_style())
        .style(styling::card_style());

    let visible = size.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .log_tail(visible)
        .into_iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![Span::styled(
                entry,
                styling::normal_text_style(),
            )]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(Clear, size);
    frame.render_widget(list, size);
}
