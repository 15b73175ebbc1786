//! Frame pacing.
//!
//! Animation is an explicit loop: while the target reports itself active,
//! wait for the next frame from the pacer and animate one frame. Tearing the
//! target down ends the loop; the pacer is not consulted again.

use log::*;
use std::thread;
use std::time::{Duration, Instant};

/// Source of frame timing. `wait_for_frame` blocks until the next frame is
/// due.
///
pub trait FramePacer {
    fn wait_for_frame(&mut self);
}

/// Anything that can be driven one frame at a time.
///
pub trait Animate {
    /// Whether the target still wants frames.
    ///
    fn is_active(&self) -> bool;

    /// Animate one frame. Returns whether anything was drawn.
    ///
    fn animate_frame(&mut self) -> bool;
}

/// Fixed-rate pacer with a per-frame budget of `1 / fps`.
///
pub struct FixedRate {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRate {
    pub fn new(fps: u32) -> Self {
        FixedRate {
            period: Duration::from_secs(1) / fps.max(1),
            next_deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FramePacer for FixedRate {
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        let deadline = match self.next_deadline {
            None => now,
            Some(deadline) if now > deadline + self.period => {
                trace!("Frame budget overrun by {:?}, resynchronizing", now - deadline);
                now
            }
            Some(deadline) => deadline,
        };
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline + self.period);
    }
}

/// Pacer that never waits. Used for offscreen simulation.
///
#[derive(Default)]
pub struct Immediate;

impl FramePacer for Immediate {
    fn wait_for_frame(&mut self) {}
}

/// Drives an `Animate` target for as long as it stays active.
///
pub struct AnimationLoop<P: FramePacer> {
    pacer: P,
}

impl<P: FramePacer> AnimationLoop<P> {
    pub fn new(pacer: P) -> Self {
        AnimationLoop { pacer }
    }

    /// Run until the target deactivates. Returns the number of frames driven.
    ///
    pub fn run<A: Animate + ?Sized>(&mut self, target: &mut A) -> u64 {
        self.run_for(target, u64::MAX)
    }

    /// Run until the target deactivates or `max_frames` frames have been
    /// driven. Returns the number of frames driven.
    ///
    pub fn run_for<A: Animate + ?Sized>(&mut self, target: &mut A, max_frames: u64) -> u64 {
        let mut frames = 0;
        while frames < max_frames && target.is_active() {
            self.pacer.wait_for_frame();
            target.animate_frame();
            frames += 1;
        }
        debug!("Animation loop finished after {} frame(s)", frames);
        frames
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPacer {
        waits: u64,
    }

    impl FramePacer for CountingPacer {
        fn wait_for_frame(&mut self) {
            self.waits += 1;
        }
    }

    struct Countdown {
        remaining: u32,
        drawn: u32,
    }

    impl Animate for Countdown {
        fn is_active(&self) -> bool {
            self.remaining > 0
        }

        fn animate_frame(&mut self) -> bool {
            self.remaining -= 1;
            self.drawn += 1;
            true
        }
    }

    #[test]
    fn run_stops_when_target_deactivates() {
        let mut animation = AnimationLoop::new(CountingPacer::default());
        let mut target = Countdown {
            remaining: 5,
            drawn: 0,
        };
        assert_eq!(animation.run(&mut target), 5);
        assert_eq!(target.drawn, 5);
        assert_eq!(animation.pacer().waits, 5);

        // Already inactive: the pacer is not consulted at all.
        assert_eq!(animation.run(&mut target), 0);
        assert_eq!(animation.pacer().waits, 5);
    }

    #[test]
    fn run_for_caps_frames() {
        let mut animation = AnimationLoop::new(Immediate);
        let mut target = Countdown {
            remaining: 100,
            drawn: 0,
        };
        assert_eq!(animation.run_for(&mut target, 10), 10);
        assert_eq!(target.remaining, 90);
    }

    #[test]
    fn fixed_rate_period() {
        assert_eq!(FixedRate::new(50).period(), Duration::from_millis(20));
        assert_eq!(FixedRate::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn fixed_rate_paces_frames() {
        let mut pacer = FixedRate::new(200);
        let start = Instant::now();
        for _ in 0..4 {
            pacer.wait_for_frame();
        }
        // First frame is immediate, the next three wait one period each.
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn fixed_rate_resyncs_after_long_overrun() {
        let mut pacer = FixedRate::new(50);
        pacer.wait_for_frame();
        thread::sleep(pacer.period() * 3);

        // No burst of catch-up frames: the late frame runs at once.
        let late = Instant::now();
        pacer.wait_for_frame();
        assert!(late.elapsed() < Duration::from_millis(10));

        // The schedule restarts from the late frame.
        let next = Instant::now();
        pacer.wait_for_frame();
        assert!(next.elapsed() >= Duration::from_millis(15));
    }
}
