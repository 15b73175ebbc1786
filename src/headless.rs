//! Offscreen simulation.
//!
//! Runs a single particle renderer against an in-memory surface, either as
//! fast as possible or paced at a fixed frame rate, and reports on the result.

use crate::animation::{AnimationLoop, FixedRate, Immediate};
use crate::error::AppResult;
use crate::field::{FieldOptions, Particle};
use crate::renderer::ParticleRenderer;
use crate::surface::{PixelBuffer, Size};
use crate::viewport::Viewport;
use log::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Largest accepted surface width or height for an offscreen run.
///
pub const MAX_SURFACE_SIDE: u32 = 8192;

/// Parameters of an offscreen run.
///
#[derive(Clone, Debug)]
pub struct Simulation {
    pub options: FieldOptions,
    pub size: Size,
    pub frames: u64,
    pub seed: Option<u64>,
    /// Pace frames at this rate instead of running unthrottled.
    pub realtime_fps: Option<u32>,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation {
            options: FieldOptions::default(),
            size: Size::new(1280, 720),
            frames: 600,
            seed: None,
            realtime_fps: None,
        }
    }
}

/// Summary of an offscreen run.
///
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub surface: Size,
    pub color_template: String,
    pub particle_count: usize,
    pub frames_drawn: u64,
    pub lit_pixels: usize,
    pub max_overshoot: f64,
    pub particles: Vec<Particle>,
}

impl SimulationReport {
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Simulation {
    /// Mount a renderer on an offscreen surface, drive it for the requested
    /// number of frames and unmount it.
    ///
    pub fn run(&self) -> SimulationReport {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let viewport = Viewport::new(self.size);
        let mut renderer = ParticleRenderer::with_rng(self.options.clone(), PixelBuffer::new(), rng);
        renderer.mount(&viewport);

        match self.realtime_fps {
            Some(fps) => AnimationLoop::new(FixedRate::new(fps)).run_for(&mut renderer, self.frames),
            None => AnimationLoop::new(Immediate).run_for(&mut renderer, self.frames),
        };
        info!(
            "Simulated {} frame(s) of {} particle(s) at {}",
            renderer.frames_drawn(),
            renderer.particles().len(),
            self.size
        );

        let report = SimulationReport {
            surface: self.size,
            color_template: self.options.color.to_string(),
            particle_count: renderer.particles().len(),
            frames_drawn: renderer.frames_drawn(),
            lit_pixels: renderer.surface().lit_pixels(),
            max_overshoot: renderer.field().map(|f| f.max_overshoot()).unwrap_or(0.0),
            particles: renderer.particles().to_vec(),
        };
        renderer.unmount();
        report
    }
}
