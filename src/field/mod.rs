//! Particle field model.
//!
//! This module contains the particle data and the per-frame physics:
//! - `Particle` with a fixed radius, color and velocity
//! - `ParticleField`, a fixed-size particle set bounded by a surface size
//! - `ColorTemplate` for per-particle opacity substitution
//! - Field error handling

mod color;
mod error;

pub use color::{ColorTemplate, Rgba, DEFAULT_TEMPLATE, OPACITY_SLOT};
pub use error::FieldError;

use crate::surface::{DrawContext, Point, Size};
use rand::Rng;
use serde::Serialize;
use std::ops::Range;

/// Number of particles when none is configured.
///
pub const DEFAULT_PARTICLE_COUNT: usize = 50;

const OPACITY_RANGE: Range<f32> = 0.1..0.5;
const RADIUS_RANGE: Range<f64> = 0.5..2.5;
const SPEED_RANGE: Range<f64> = -0.25..0.25;

/// Options for a single particle field instance.
///
#[derive(Clone, Debug, PartialEq)]
pub struct FieldOptions {
    pub color: ColorTemplate,
    pub particle_count: usize,
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions {
            color: ColorTemplate::default(),
            particle_count: DEFAULT_PARTICLE_COUNT,
        }
    }
}

/// A single animated point.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    pub color: Rgba,
}

impl Particle {
    /// Advance one frame within `[0, width] × [0, height]`. A coordinate
    /// that leaves its range is clamped back onto the edge and the matching
    /// velocity component is negated.
    ///
    pub fn step(&mut self, width: f64, height: f64) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        reflect(&mut self.position.x, &mut self.velocity.x, width);
        reflect(&mut self.position.y, &mut self.velocity.y, height);
    }
}

fn reflect(position: &mut f64, velocity: &mut f64, limit: f64) {
    if *position < 0.0 || *position > limit {
        *velocity = -*velocity;
        *position = position.clamp(0.0, limit);
    }
}

/// Fixed-size particle set bounded by a surface size.
///
#[derive(Clone, Debug)]
pub struct ParticleField {
    bounds: Size,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Generate `options.particle_count` particles with random positions
    /// inside `bounds` and random radius, opacity and velocity.
    ///
    pub fn generate<R: Rng>(options: &FieldOptions, bounds: Size, rng: &mut R) -> Self {
        let width = bounds.width as f64;
        let height = bounds.height as f64;
        let particles = (0..options.particle_count)
            .map(|_| {
                let opacity = rng.gen_range(OPACITY_RANGE);
                Particle {
                    position: Point::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
                    radius: rng.gen_range(RADIUS_RANGE),
                    color: options.color.with_opacity(opacity),
                    velocity: Point::new(rng.gen_range(SPEED_RANGE), rng.gen_range(SPEED_RANGE)),
                }
            })
            .collect();
        ParticleField { bounds, particles }
    }

    /// Build a field from explicit particles.
    ///
    pub fn from_particles(bounds: Size, particles: Vec<Particle>) -> Self {
        ParticleField { bounds, particles }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Paint every particle as a filled circle at its current position.
    ///
    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        for particle in &self.particles {
            ctx.fill_circle(particle.position, particle.radius, particle.color);
        }
    }

    /// Advance every particle by one frame.
    ///
    pub fn step(&mut self) {
        let width = self.bounds.width as f64;
        let height = self.bounds.height as f64;
        for particle in self.particles.iter_mut() {
            particle.step(width, height);
        }
    }

    /// Largest distance any particle currently sits outside the bounds.
    ///
    pub fn max_overshoot(&self) -> f64 {
        let width = self.bounds.width as f64;
        let height = self.bounds.height as f64;
        self.particles
            .iter()
            .map(|p| {
                let ox = (-p.position.x).max(p.position.x - width).max(0.0);
                let oy = (-p.position.y).max(p.position.y - height).max(0.0);
                ox.max(oy)
            })
            .fold(0.0, f64::max)
    }
}
