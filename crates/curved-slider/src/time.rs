//! Frame timing.
//!
//! The slider itself never reads the wall clock: every entry point takes a
//! `now: Duration` measured from an arbitrary origin. [`Time`] is what the
//! window host uses to produce that value once per redraw.

use std::time::{Duration, Instant};

/// Frame timing, updated by the host at the start of each frame.
#[derive(Clone, Copy)]
pub struct Time {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call at the start of each frame to update timing.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.elapsed = now - self.startup;
        self.frame_count += 1;
    }

    /// Time since startup, sampled now rather than at frame start.
    ///
    /// Used for events that arrive between redraws.
    pub fn now(&self) -> Duration {
        self.startup.elapsed()
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total elapsed time at the start of the current frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of frames so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
