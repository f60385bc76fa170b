//! Frame clock
//!
//! Variable-step: each frame advances by whatever delta the host measured.

use std::time::Duration;

/// Frame counter and accumulated game time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frame_count: u64,
    elapsed: Duration,
    last_delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds since the previous frame.
    pub fn delta(&self) -> f32 {
        self.last_delta
    }

    pub fn total_time(&self) -> Duration {
        self.elapsed
    }

    /// Start a new frame `dt` seconds after the last one. Negative or
    /// non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame_count += 1;
        self.last_delta = dt;
        self.elapsed += Duration::from_secs_f32(dt);
    }
}
