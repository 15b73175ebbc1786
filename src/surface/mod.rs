//! Drawing surfaces.
//!
//! A surface is the pixel buffer a renderer paints into. Renderers own their
//! surface outright; there is no lookup by name. A surface may be unable to
//! hand out a drawing context (for instance before it has been laid out),
//! in which case callers skip drawing.

mod pixel;

pub use pixel::PixelBuffer;

use crate::field::Rgba;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a drawing surface, used to tell instances apart in logs.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn next() -> Self {
        SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Surface dimensions in device pixels.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Immediate-mode 2D drawing operations on a surface.
///
pub trait DrawContext {
    fn size(&self) -> Size;

    /// Reset every pixel to fully transparent.
    ///
    fn clear(&mut self);

    /// Blend `color` over the pixel at `(x, y)`. Out-of-range coordinates
    /// are ignored.
    ///
    fn blend(&mut self, x: i64, y: i64, color: Rgba);

    /// Fill a circle with anti-aliased edges. The pixel under the center is
    /// always painted, so sub-pixel radii remain visible.
    ///
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        let reach = radius.ceil() as i64 + 1;
        let cx = center.x.floor() as i64;
        let cy = center.y.floor() as i64;
        for y in (cy - reach)..=(cy + reach) {
            for x in (cx - reach)..=(cx + reach) {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                let distance = (dx * dx + dy * dy).sqrt();
                let coverage = if x == cx && y == cy {
                    1.0
                } else {
                    (radius + 0.5 - distance).clamp(0.0, 1.0)
                };
                if coverage > 0.0 {
                    self.blend(x, y, color.fade(coverage as f32));
                }
            }
        }
    }
}

/// Owned drawing surface handle.
///
pub trait Surface {
    fn id(&self) -> SurfaceId;

    fn size(&self) -> Size;

    /// Resize the backing buffer, discarding its contents.
    ///
    fn resize(&mut self, size: Size);

    /// Return the drawing context, or `None` when the surface cannot be
    /// drawn on yet.
    ///
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}
