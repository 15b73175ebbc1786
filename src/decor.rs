//! Decorative backdrop layers drawn beneath the particle fields: a faint
//! grid, three slowly pulsing glow orbs and a handful of sweeping beams.
//!
//! Time is advanced by a fixed step per frame rather than read from a wall
//! clock, so a given frame always draws the same pixels.

use crate::animation::Animate;
use crate::field::Rgba;
use crate::surface::{DrawContext, Point, Size, Surface};
use crate::viewport::{ResizeSubscription, Viewport};
use log::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const GRID_SPACING: u32 = 16;
const GRID_COLOR: Rgba = Rgba {
    r: 134,
    g: 239,
    b: 172,
    a: 0.06,
};

struct Orb {
    /// Center as a fraction of the surface size.
    center: (f64, f64),
    /// Radius as a fraction of the smaller surface dimension.
    radius: f64,
    color: Rgba,
    period: f64,
}

const ORBS: [Orb; 3] = [
    Orb {
        center: (0.15, 0.30),
        radius: 0.45,
        color: Rgba {
            r: 134,
            g: 239,
            b: 172,
            a: 0.10,
        },
        period: 8.0,
    },
    Orb {
        center: (0.85, 0.70),
        radius: 0.34,
        color: Rgba {
            r: 16,
            g: 185,
            b: 129,
            a: 0.10,
        },
        period: 10.0,
    },
    Orb {
        center: (0.40, 0.62),
        radius: 0.30,
        color: Rgba {
            r: 59,
            g: 130,
            b: 246,
            a: 0.05,
        },
        period: 12.0,
    },
];

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Horizontal,
    Vertical,
}

struct Beam {
    axis: Axis,
    /// Offset across the beam's axis as a fraction of the surface size.
    offset: f64,
    color: Rgba,
    period: f64,
    delay: f64,
}

const BEAMS: [Beam; 5] = [
    Beam {
        axis: Axis::Horizontal,
        offset: 0.5,
        color: Rgba {
            r: 134,
            g: 239,
            b: 172,
            a: 0.20,
        },
        period: 6.0,
        delay: 0.0,
    },
    Beam {
        axis: Axis::Horizontal,
        offset: 1.0 / 3.0,
        color: Rgba {
            r: 52,
            g: 211,
            b: 153,
            a: 0.20,
        },
        period: 6.0,
        delay: 0.15,
    },
    Beam {
        axis: Axis::Horizontal,
        offset: 2.0 / 3.0,
        color: Rgba {
            r: 96,
            g: 165,
            b: 250,
            a: 0.20,
        },
        period: 6.0,
        delay: 0.3,
    },
    Beam {
        axis: Axis::Vertical,
        offset: 0.25,
        color: Rgba {
            r: 134,
            g: 239,
            b: 172,
            a: 0.10,
        },
        period: 8.0,
        delay: 0.0,
    },
    Beam {
        axis: Axis::Vertical,
        offset: 2.0 / 3.0,
        color: Rgba {
            r: 52,
            g: 211,
            b: 153,
            a: 0.10,
        },
        period: 8.0,
        delay: 0.2,
    },
];

/// Which decorative layers to draw.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorOptions {
    #[serde(default = "enabled")]
    pub grid: bool,
    #[serde(default = "enabled")]
    pub orbs: bool,
    #[serde(default = "enabled")]
    pub beams: bool,
}

fn enabled() -> bool {
    true
}

impl DecorOptions {
    pub fn none() -> Self {
        DecorOptions {
            grid: false,
            orbs: false,
            beams: false,
        }
    }

    pub fn any(&self) -> bool {
        self.grid || self.orbs || self.beams
    }
}

impl Default for DecorOptions {
    fn default() -> Self {
        DecorOptions {
            grid: true,
            orbs: true,
            beams: true,
        }
    }
}

/// Opacity multiplier of a pulse with the given period: 1.0 at the start
/// of each cycle, 0.5 halfway through.
///
pub fn pulse(elapsed: f64, period: f64) -> f64 {
    0.75 + 0.25 * (TAU * elapsed / period).cos()
}

/// Position of a beam's center along a track of `length` pixels. The beam
/// enters fully off one end and leaves fully off the other once per period.
///
pub fn beam_center(length: f64, elapsed: f64, period: f64, delay: f64) -> f64 {
    let phase = ((elapsed - delay) / period).rem_euclid(1.0);
    let half = length / 4.0;
    -half + phase * (length + 2.0 * half)
}

pub fn draw_grid(ctx: &mut dyn DrawContext) {
    let size = ctx.size();
    for y in 0..size.height {
        for x in 0..size.width {
            if x % GRID_SPACING == 0 || y % GRID_SPACING == 0 {
                ctx.blend(x as i64, y as i64, GRID_COLOR);
            }
        }
    }
}

pub fn draw_orbs(ctx: &mut dyn DrawContext, elapsed: f64) {
    let size = ctx.size();
    let span = size.width.min(size.height) as f64;
    for orb in &ORBS {
        let center = Point::new(
            orb.center.0 * size.width as f64,
            orb.center.1 * size.height as f64,
        );
        let radius = orb.radius * span;
        if radius <= 0.0 {
            continue;
        }
        let color = orb.color.fade(pulse(elapsed, orb.period) as f32);
        let x0 = (center.x - radius).floor().max(0.0) as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor().max(0.0) as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                let falloff = 1.0 - (dx * dx + dy * dy).sqrt() / radius;
                if falloff > 0.0 {
                    ctx.blend(x, y, color.fade((falloff * falloff) as f32));
                }
            }
        }
    }
}

pub fn draw_beams(ctx: &mut dyn DrawContext, elapsed: f64) {
    let size = ctx.size();
    for beam in &BEAMS {
        let (length, across) = match beam.axis {
            Axis::Horizontal => (size.width as f64, size.height as f64),
            Axis::Vertical => (size.height as f64, size.width as f64),
        };
        let half = length / 4.0;
        if half <= 0.0 {
            continue;
        }
        let line = (beam.offset * across).floor() as i64;
        let center = beam_center(length, elapsed, beam.period, beam.delay);
        let start = (center - half).floor().max(0.0) as i64;
        let end = (center + half).ceil().min(length) as i64;
        for along in start..end {
            let distance = (along as f64 + 0.5 - center).abs() / half;
            if distance >= 1.0 {
                continue;
            }
            let color = beam.color.fade((1.0 - distance) as f32);
            match beam.axis {
                Axis::Horizontal => ctx.blend(along, line, color),
                Axis::Vertical => ctx.blend(line, along, color),
            }
        }
    }
}

/// Renders the enabled decorative layers to its own surface each frame.
///
pub struct DecorRenderer<S: Surface> {
    options: DecorOptions,
    surface: S,
    subscription: Option<ResizeSubscription>,
    elapsed: f64,
    frame_step: f64,
}

impl<S: Surface> DecorRenderer<S> {
    /// Return a new unmounted decor renderer advancing `1 / fps` seconds per
    /// frame.
    ///
    pub fn new(options: DecorOptions, surface: S, fps: u32) -> Self {
        DecorRenderer {
            options,
            surface,
            subscription: None,
            elapsed: 0.0,
            frame_step: 1.0 / fps.max(1) as f64,
        }
    }

    pub fn mount(&mut self, viewport: &Viewport) {
        if self.subscription.is_some() {
            return;
        }
        debug!("Mounting decor renderer on {}...", self.surface.id());
        self.subscription = Some(viewport.subscribe());
        self.surface.resize(viewport.size());
    }

    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Unmounting decor renderer on {}", self.surface.id());
            self.surface.resize(Size::default());
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn options(&self) -> DecorOptions {
        self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl<S: Surface> Animate for DecorRenderer<S> {
    fn is_active(&self) -> bool {
        self.is_mounted()
    }

    fn animate_frame(&mut self) -> bool {
        let pending = match &self.subscription {
            Some(subscription) => subscription.take_latest(),
            None => return false,
        };
        if let Some(size) = pending {
            self.surface.resize(size);
        }
        let Some(ctx) = self.surface.context() else {
            return false;
        };
        ctx.clear();
        if self.options.grid {
            draw_grid(ctx);
        }
        if self.options.orbs {
            draw_orbs(ctx, self.elapsed);
        }
        if self.options.beams {
            draw_beams(ctx, self.elapsed);
        }
        self.elapsed += self.frame_step;
        true
    }
}

impl<S: Surface> Drop for DecorRenderer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
