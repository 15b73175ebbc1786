//! The full backdrop: one viewport, the decor layer and every configured
//! particle field, each on its own surface.

use crate::animation::Animate;
use crate::config::Config;
use crate::decor::{DecorOptions, DecorRenderer};
use crate::field::FieldOptions;
use crate::renderer::ParticleRenderer;
use crate::surface::{PixelBuffer, Size};
use crate::viewport::Viewport;
use log::*;

pub struct Scene {
    fields: Vec<ParticleRenderer<PixelBuffer>>,
    decor: DecorRenderer<PixelBuffer>,
    viewport: Viewport,
}

impl Scene {
    /// Build an unmounted scene with one renderer per field option.
    ///
    pub fn new(fields: &[FieldOptions], decor: DecorOptions, fps: u32, size: Size) -> Self {
        Scene {
            fields: fields
                .iter()
                .cloned()
                .map(|options| ParticleRenderer::new(options, PixelBuffer::new()))
                .collect(),
            decor: DecorRenderer::new(decor, PixelBuffer::new(), fps),
            viewport: Viewport::new(size),
        }
    }

    pub fn from_config(config: &Config, size: Size) -> Self {
        Scene::new(&config.fields, config.decor, config.frame_rate, size)
    }

    pub fn mount(&mut self) {
        info!(
            "Mounting backdrop with {} field(s) at {}",
            self.fields.len(),
            self.viewport.size()
        );
        self.decor.mount(&self.viewport);
        for field in self.fields.iter_mut() {
            field.mount(&self.viewport);
        }
    }

    pub fn unmount(&mut self) {
        self.decor.unmount();
        for field in self.fields.iter_mut() {
            field.unmount();
        }
    }

    /// Mount or unmount every layer to match `mounted`.
    ///
    pub fn set_mounted(&mut self, mounted: bool) {
        if mounted != self.is_active() {
            if mounted {
                self.mount();
            } else {
                self.unmount();
            }
        }
    }

    pub fn resize(&self, size: Size) {
        if size != self.viewport.size() {
            self.viewport.resize(size);
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn fields(&self) -> &[ParticleRenderer<PixelBuffer>] {
        &self.fields
    }

    /// Surfaces in paint order, bottom first.
    ///
    pub fn layers(&self) -> Vec<&PixelBuffer> {
        let mut layers = Vec::with_capacity(self.fields.len() + 1);
        if self.decor.options().any() {
            layers.push(self.decor.surface());
        }
        layers.extend(self.fields.iter().map(|f| f.surface()));
        layers
    }
}

impl Animate for Scene {
    fn is_active(&self) -> bool {
        self.decor.is_active() || self.fields.iter().any(|f| f.is_active())
    }

    fn animate_frame(&mut self) -> bool {
        let mut drawn = self.decor.animate_frame();
        for field in self.fields.iter_mut() {
            drawn |= field.animate_frame();
        }
        drawn
    }
}
