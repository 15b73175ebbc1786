//! Particle field renderer.
//!
//! Owns a drawing surface and a particle field, and redraws the field once
//! per frame while mounted. A renderer whose surface has no drawing context
//! stays inert: it holds no particles and draws nothing, without error.

use crate::animation::Animate;
use crate::field::{FieldOptions, Particle, ParticleField};
use crate::surface::{Size, Surface};
use crate::viewport::{ResizeSubscription, Viewport};
use log::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Renderer lifecycle.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
}

pub struct ParticleRenderer<S: Surface> {
    options: FieldOptions,
    surface: S,
    field: Option<ParticleField>,
    subscription: Option<ResizeSubscription>,
    rng: StdRng,
    frames_drawn: u64,
}

impl<S: Surface> ParticleRenderer<S> {
    /// Return a new unmounted renderer that owns `surface`.
    ///
    pub fn new(options: FieldOptions, surface: S) -> Self {
        ParticleRenderer::with_rng(options, surface, StdRng::from_entropy())
    }

    /// Return a new unmounted renderer with a caller-provided random source.
    ///
    pub fn with_rng(options: FieldOptions, surface: S, rng: StdRng) -> Self {
        ParticleRenderer {
            options,
            surface,
            field: None,
            subscription: None,
            rng,
            frames_drawn: 0,
        }
    }

    /// Subscribe to viewport resizes, size the surface to the viewport and
    /// populate the field. Mounting an already mounted renderer does nothing.
    ///
    pub fn mount(&mut self, viewport: &Viewport) {
        if self.subscription.is_some() {
            return;
        }
        debug!(
            "Mounting particle renderer on {} with {} particle(s)...",
            self.surface.id(),
            self.options.particle_count
        );
        self.subscription = Some(viewport.subscribe());
        self.populate(viewport.size());
    }

    /// Release the resize subscription and discard the particles.
    ///
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Unmounting particle renderer on {}", self.surface.id());
            self.surface.resize(Size::default());
        }
        self.field = None;
    }

    /// Resize the surface and regenerate the particle set from scratch.
    ///
    fn populate(&mut self, size: Size) {
        self.surface.resize(size);
        if self.surface.context().is_none() {
            debug!(
                "{} has no drawing context at {}, staying inert",
                self.surface.id(),
                size
            );
            self.field = None;
            return;
        }
        self.field = Some(ParticleField::generate(&self.options, size, &mut self.rng));
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.subscription {
            Some(_) => Lifecycle::Mounted,
            None => Lifecycle::Unmounted,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle() == Lifecycle::Mounted
    }

    /// Return the current particles, empty when unmounted or inert.
    ///
    pub fn particles(&self) -> &[Particle] {
        self.field.as_ref().map(|f| f.particles()).unwrap_or(&[])
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl<S: Surface> Animate for ParticleRenderer<S> {
    fn is_active(&self) -> bool {
        self.is_mounted()
    }

    /// Apply any pending resize, then clear the surface, draw every particle
    /// and advance the field by one step.
    ///
    fn animate_frame(&mut self) -> bool {
        let pending = match &self.subscription {
            Some(subscription) => subscription.take_latest(),
            None => return false,
        };
        if let Some(size) = pending {
            debug!("{} resized to {}, regenerating particles", self.surface.id(), size);
            self.populate(size);
        }

        let Some(field) = self.field.as_mut() else {
            return false;
        };
        let Some(ctx) = self.surface.context() else {
            return false;
        };
        ctx.clear();
        field.draw(ctx);
        field.step();
        self.frames_drawn += 1;
        true
    }
}

impl<S: Surface> Drop for ParticleRenderer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationLoop, FramePacer};
    use crate::field::{ColorTemplate, Rgba, DEFAULT_PARTICLE_COUNT};
    use crate::surface::{DrawContext, PixelBuffer, Point, SurfaceId};

    fn seeded(options: FieldOptions, surface: PixelBuffer) -> ParticleRenderer<PixelBuffer> {
        ParticleRenderer::with_rng(options, surface, StdRng::seed_from_u64(11))
    }

    fn with_count(count: usize) -> FieldOptions {
        FieldOptions {
            particle_count: count,
            ..FieldOptions::default()
        }
    }

    /// Surface that never provides a drawing context.
    struct DetachedSurface {
        id: SurfaceId,
        size: Size,
    }

    impl Surface for DetachedSurface {
        fn id(&self) -> SurfaceId {
            self.id
        }

        fn size(&self) -> Size {
            self.size
        }

        fn resize(&mut self, size: Size) {
            self.size = size;
        }

        fn context(&mut self) -> Option<&mut dyn DrawContext> {
            None
        }
    }

    #[test]
    fn defaults_yield_fifty_particles() {
        let viewport = Viewport::new(Size::new(200, 100));
        let mut renderer = seeded(FieldOptions::default(), PixelBuffer::new());
        renderer.mount(&viewport);

        assert_eq!(renderer.particles().len(), DEFAULT_PARTICLE_COUNT);
        assert_eq!(renderer.options().color, ColorTemplate::default());
        for p in renderer.particles() {
            assert!(p.color.a > 0.1 - f32::EPSILON && p.color.a < 0.5);
        }
    }

    #[test]
    fn mount_sizes_surface_to_viewport() {
        let viewport = Viewport::new(Size::new(64, 48));
        let mut renderer = seeded(with_count(3), PixelBuffer::new());
        assert_eq!(renderer.lifecycle(), Lifecycle::Unmounted);
        renderer.mount(&viewport);
        assert_eq!(renderer.lifecycle(), Lifecycle::Mounted);
        assert_eq!(Surface::size(renderer.surface()), Size::new(64, 48));
    }

    #[test]
    fn mount_registers_exactly_one_listener() {
        let viewport = Viewport::new(Size::new(10, 10));
        let mut renderer = seeded(with_count(1), PixelBuffer::new());
        renderer.mount(&viewport);
        renderer.mount(&viewport);
        assert_eq!(viewport.listener_count(), 1);

        renderer.unmount();
        assert_eq!(viewport.listener_count(), 0);
        assert!(renderer.particles().is_empty());
    }

    #[test]
    fn unmount_clears_last_frame() {
        let viewport = Viewport::new(Size::new(40, 40));
        let mut renderer = seeded(with_count(10), PixelBuffer::new());
        renderer.mount(&viewport);
        assert!(renderer.animate_frame());
        assert!(renderer.surface().lit_pixels() > 0);

        renderer.unmount();
        assert_eq!(renderer.surface().lit_pixels(), 0);
        assert!(Surface::size(renderer.surface()).is_empty());
    }

    #[test]
    fn drop_releases_listener() {
        let viewport = Viewport::new(Size::new(10, 10));
        {
            let mut renderer = seeded(with_count(1), PixelBuffer::new());
            renderer.mount(&viewport);
            assert_eq!(viewport.listener_count(), 1);
        }
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn exact_count_after_every_resize() {
        let viewport = Viewport::new(Size::new(50, 50));
        let mut renderer = seeded(with_count(17), PixelBuffer::new());
        renderer.mount(&viewport);
        assert_eq!(renderer.particles().len(), 17);

        for size in [Size::new(120, 30), Size::new(8, 8), Size::new(300, 200)] {
            viewport.resize(size);
            assert!(renderer.animate_frame());
            assert_eq!(renderer.particles().len(), 17);
            assert_eq!(renderer.field().map(|f| f.bounds()), Some(size));
            assert_eq!(Surface::size(renderer.surface()), size);
        }
    }

    #[test]
    fn resize_regenerates_particles() {
        let viewport = Viewport::new(Size::new(400, 400));
        let mut renderer = seeded(with_count(20), PixelBuffer::new());
        renderer.mount(&viewport);
        let before: Vec<Particle> = renderer.particles().to_vec();

        viewport.resize(Size::new(400, 400));
        renderer.animate_frame();
        let after = renderer.particles();
        assert_eq!(after.len(), before.len());
        assert_ne!(before[0].velocity, after[0].velocity);
    }

    #[test]
    fn positions_stay_in_bounds() {
        let viewport = Viewport::new(Size::new(40, 30));
        let mut renderer = seeded(with_count(100), PixelBuffer::new());
        renderer.mount(&viewport);
        for _ in 0..2_000 {
            renderer.animate_frame();
            for p in renderer.particles() {
                assert!((0.0..=40.0).contains(&p.position.x));
                assert!((0.0..=30.0).contains(&p.position.y));
            }
        }
    }

    #[test]
    fn single_particle_reflects_at_right_edge() {
        let viewport = Viewport::new(Size::new(100, 100));
        let mut renderer = seeded(with_count(1), PixelBuffer::new());
        renderer.mount(&viewport);
        renderer.field = Some(ParticleField::from_particles(
            Size::new(100, 100),
            vec![Particle {
                position: Point::new(99.0, 50.0),
                velocity: Point::new(1.0, 0.0),
                radius: 1.0,
                color: Rgba::new(134, 239, 172, 0.3),
            }],
        ));

        let mut xs = vec![];
        for _ in 0..4 {
            renderer.animate_frame();
            let p = &renderer.particles()[0];
            assert!(p.position.x <= 100.0);
            xs.push(p.position.x);
        }
        assert_eq!(xs, vec![100.0, 100.0, 99.0, 98.0]);
        assert!(renderer.particles()[0].velocity.x < 0.0);
    }

    #[test]
    fn animate_frame_draws_particles() {
        let viewport = Viewport::new(Size::new(30, 30));
        let mut renderer = seeded(with_count(5), PixelBuffer::new());
        renderer.mount(&viewport);
        assert!(renderer.animate_frame());
        assert!(renderer.surface().lit_pixels() > 0);
        assert_eq!(renderer.frames_drawn(), 1);
    }

    #[test]
    fn detached_surface_is_inert() {
        let viewport = Viewport::new(Size::new(30, 30));
        let surface = DetachedSurface {
            id: SurfaceId::next(),
            size: Size::default(),
        };
        let mut renderer =
            ParticleRenderer::with_rng(with_count(5), surface, StdRng::seed_from_u64(1));
        renderer.mount(&viewport);
        assert!(renderer.is_mounted());
        assert!(renderer.particles().is_empty());
        assert!(!renderer.animate_frame());
        assert_eq!(renderer.frames_drawn(), 0);
    }

    #[test]
    fn zero_sized_viewport_starts_rendering_after_resize() {
        let viewport = Viewport::new(Size::new(0, 0));
        let mut renderer = seeded(with_count(4), PixelBuffer::new());
        renderer.mount(&viewport);
        assert!(renderer.particles().is_empty());
        assert!(!renderer.animate_frame());

        viewport.resize(Size::new(20, 20));
        assert!(renderer.animate_frame());
        assert_eq!(renderer.particles().len(), 4);
    }

    #[test]
    fn zero_particles_is_allowed() {
        let viewport = Viewport::new(Size::new(20, 20));
        let mut renderer = seeded(with_count(0), PixelBuffer::new());
        renderer.mount(&viewport);
        assert!(renderer.particles().is_empty());
        assert!(renderer.animate_frame());
        assert_eq!(renderer.surface().lit_pixels(), 0);
    }

    #[test]
    fn instances_are_independent() {
        let first_viewport = Viewport::new(Size::new(80, 60));
        let second_viewport = Viewport::new(Size::new(80, 60));
        let mut first = seeded(with_count(10), PixelBuffer::new());
        let mut second = seeded(with_count(25), PixelBuffer::new());
        first.mount(&first_viewport);
        second.mount(&second_viewport);
        assert_ne!(first.surface().id(), second.surface().id());

        first_viewport.resize(Size::new(200, 10));
        first.animate_frame();
        second.animate_frame();

        assert_eq!(first.particles().len(), 10);
        assert_eq!(second.particles().len(), 25);
        assert_eq!(Surface::size(first.surface()), Size::new(200, 10));
        assert_eq!(Surface::size(second.surface()), Size::new(80, 60));
    }

    #[test]
    fn shared_viewport_keeps_per_instance_counts() {
        let viewport = Viewport::new(Size::new(80, 60));
        let mut first = seeded(with_count(3), PixelBuffer::new());
        let mut second = seeded(with_count(9), PixelBuffer::new());
        first.mount(&viewport);
        second.mount(&viewport);
        assert_eq!(viewport.listener_count(), 2);

        viewport.resize(Size::new(33, 44));
        first.animate_frame();
        second.animate_frame();
        assert_eq!(first.particles().len(), 3);
        assert_eq!(second.particles().len(), 9);

        first.unmount();
        assert_eq!(viewport.listener_count(), 1);
        assert!(second.animate_frame());
    }

    #[derive(Default)]
    struct SpyPacer {
        calls: u64,
    }

    impl FramePacer for SpyPacer {
        fn wait_for_frame(&mut self) {
            self.calls += 1;
        }
    }

    /// Unmounts its renderer after a fixed number of frames.
    struct UnmountAfter {
        renderer: ParticleRenderer<PixelBuffer>,
        frames_left: u32,
    }

    impl Animate for UnmountAfter {
        fn is_active(&self) -> bool {
            self.renderer.is_active()
        }

        fn animate_frame(&mut self) -> bool {
            let drawn = self.renderer.animate_frame();
            self.frames_left -= 1;
            if self.frames_left == 0 {
                self.renderer.unmount();
            }
            drawn
        }
    }

    #[test]
    fn unmount_stops_scheduling() {
        let viewport = Viewport::new(Size::new(50, 50));
        let mut renderer = seeded(with_count(5), PixelBuffer::new());
        renderer.mount(&viewport);
        let mut target = UnmountAfter {
            renderer,
            frames_left: 3,
        };

        let mut animation = AnimationLoop::new(SpyPacer::default());
        assert_eq!(animation.run(&mut target), 3);
        assert_eq!(animation.pacer().calls, 3);
        assert_eq!(target.renderer.frames_drawn(), 3);

        animation.run(&mut target);
        assert_eq!(animation.pacer().calls, 3);
        assert!(!target.renderer.animate_frame());
        assert_eq!(viewport.listener_count(), 0);
    }
}
