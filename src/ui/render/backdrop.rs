use crate::surface::{PixelBuffer, Size};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Glyph covering the top half of a cell: fg paints the upper pixel, bg the
/// lower one.
///
const UPPER_HALF: &str = "▀";

/// Device-pixel size of a terminal area: one pixel per column, two per row.
///
pub fn pixel_size(area: Rect) -> Size {
    Size::new(area.width as u32, area.height as u32 * 2)
}

/// Full-bleed widget compositing surfaces, bottom first, over an opaque
/// background. It only paints cells; it holds no state and takes no input.
///
pub struct Backdrop<'a> {
    layers: Vec<&'a PixelBuffer>,
    background: (u8, u8, u8),
}

impl<'a> Backdrop<'a> {
    pub fn new(layers: Vec<&'a PixelBuffer>, background: (u8, u8, u8)) -> Self {
        Backdrop { layers, background }
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let (r, g, b) = self
            .layers
            .iter()
            .fold(self.background, |below, layer| layer.composite_over(x, y, below));
        Color::Rgb(r, g, b)
    }
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.pixel(col as u32, row as u32 * 2);
                let bottom = self.pixel(col as u32, row as u32 * 2 + 1);
                buf.get_mut(area.x + col, area.y + row)
                    .set_symbol(UPPER_HALF)
                    .set_fg(top)
                    .set_bg(bottom);
            }
        }
    }
}
