use super::{DrawContext, Size, Surface, SurfaceId};
use crate::field::Rgba;

/// Premultiplied RGBA pixel with channels in `0.0..=1.0`.
///
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Premul {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Premul {
    const TRANSPARENT: Premul = Premul {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    fn from_rgba(color: Rgba) -> Self {
        Premul {
            r: color.r as f32 / 255.0 * color.a,
            g: color.g as f32 / 255.0 * color.a,
            b: color.b as f32 / 255.0 * color.a,
            a: color.a,
        }
    }

    /// Source-over: `self` painted on top of `dst`.
    ///
    fn over(self, dst: Premul) -> Premul {
        let keep = 1.0 - self.a;
        Premul {
            r: self.r + dst.r * keep,
            g: self.g + dst.g * keep,
            b: self.b + dst.b * keep,
            a: self.a + dst.a * keep,
        }
    }
}

/// In-memory RGBA surface.
///
/// A buffer with zero area has nothing to draw on and reports no context.
///
pub struct PixelBuffer {
    id: SurfaceId,
    size: Size,
    pixels: Vec<Premul>,
}

impl PixelBuffer {
    /// Create a new, empty surface. It has no drawing context until it is
    /// given a non-zero size.
    ///
    pub fn new() -> Self {
        PixelBuffer {
            id: SurfaceId::next(),
            size: Size::default(),
            pixels: vec![],
        }
    }

    pub fn with_size(size: Size) -> Self {
        let mut buffer = PixelBuffer::new();
        buffer.resize(size);
        buffer
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    /// Return the coverage (alpha) at a pixel, or zero outside the buffer.
    ///
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        self.index(x as i64, y as i64)
            .map(|i| self.pixels[i].a)
            .unwrap_or(0.0)
    }

    /// Composite the pixel at `(x, y)` over an opaque backdrop color and
    /// return the flattened RGB.
    ///
    pub fn composite_over(&self, x: u32, y: u32, backdrop: (u8, u8, u8)) -> (u8, u8, u8) {
        let bg = Premul {
            r: backdrop.0 as f32 / 255.0,
            g: backdrop.1 as f32 / 255.0,
            b: backdrop.2 as f32 / 255.0,
            a: 1.0,
        };
        let out = match self.index(x as i64, y as i64) {
            Some(i) => self.pixels[i].over(bg),
            None => bg,
        };
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (to_u8(out.r), to_u8(out.g), to_u8(out.b))
    }

    /// Number of pixels with any coverage.
    ///
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0.0).count()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        PixelBuffer::new()
    }
}

impl DrawContext for PixelBuffer {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.pixels.fill(Premul::TRANSPARENT);
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = Premul::from_rgba(color).over(self.pixels[i]);
        }
    }
}

impl Surface for PixelBuffer {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.pixels = vec![Premul::TRANSPARENT; size.area()];
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.size.is_empty() {
            return None;
        }
        Some(self)
    }
}
