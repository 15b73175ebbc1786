use ratatui::style::{Color, Modifier, Style};

/// Opaque color the backdrop layers are composited over.
///
pub const BACKGROUND: (u8, u8, u8) = (9, 9, 11);

const CARD_BACKGROUND: Color = Color::Rgb(17, 17, 20);
const ACCENT: Color = Color::Rgb(134, 239, 172);
const TEXT: Color = Color::Rgb(228, 228, 231);
const MUTED: Color = Color::Rgb(113, 113, 122);

/// Return the style for the foreground card surface.
///
pub fn card_style() -> Style {
    Style::default().bg(CARD_BACKGROUND).fg(TEXT)
}

/// Return the border style for the foreground card.
///
pub fn card_border_style() -> Style {
    Style::default().fg(ACCENT)
}

/// Return the style for the headline.
///
pub fn headline_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style() -> Style {
    Style::default().fg(TEXT)
}

/// Return the style for secondary text such as key hints.
///
pub fn muted_text_style() -> Style {
    Style::default().fg(MUTED)
}
