//! Frame clocks.
//!
//! The coordinator never reads wall time directly; it asks a [`FrameClock`]
//! so tests can drive playback frame by frame.

use std::time::Instant;

/// Monotonic seconds since some fixed origin.
pub trait FrameClock {
    fn now_secs(&mut self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now_secs(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualClock {
    now: f64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Negative steps are ignored.
    pub fn advance(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.now += secs;
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

impl FrameClock for VirtualClock {
    fn now_secs(&mut self) -> f64 {
        self.now
    }
}
