//! Fixed-timestep frame clock.
//!
//! The engine never reads wall-clock time; callers advance a
//! [`FrameClock`] once per update and pass its `now` down explicitly.

use std::time::Duration;

/// Monotonic time source advancing by a fixed step per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    step: Duration,
    now: Duration,
    frames: u64,
}

impl FrameClock {
    /// Default update rate.
    pub const DEFAULT_HZ: u32 = 60;

    /// A clock advancing by `step` per frame, starting at zero.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            frames: 0,
        }
    }

    /// A clock running at `hz` frames per second (at least 1).
    #[must_use]
    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Advance one frame and return the new time.
    pub fn tick(&mut self) -> Duration {
        self.now += self.step;
        self.frames += 1;
        self.now
    }

    /// Time since the clock started.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Frames elapsed.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Duration of one frame.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_hz(Self::DEFAULT_HZ)
    }
}
