//! Frame timing utilities

use std::time::Instant;

/// Frame timer producing the `dt` fed into `Stage::update`
///
/// Deltas are clamped to `max_delta` so a long stall (debugger break, window
/// drag) does not make every running animation jump to its end at once.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer with a 100ms delta cap
    pub fn new() -> Self {
        Self::with_max_delta(0.1)
    }

    /// Create a new timer with a custom delta cap (seconds)
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta,
        }
    }

    /// Update the timer (should be called once per frame) and return the
    /// clamped delta in seconds
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.advance(elapsed.as_secs_f32());
        self.last_frame = now;
        self.delta_time
    }

    /// Advance by an explicit delta instead of the wall clock
    ///
    /// Used by headless loops and tests that need deterministic frames.
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.delta_time = delta.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed (clamped) time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut timer = Timer::with_max_delta(0.05);

        assert_relative_eq!(timer.advance(0.016), 0.016);
        assert_relative_eq!(timer.advance(2.0), 0.05);
        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.total_time(), 0.066, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut timer = Timer::new();

        assert_relative_eq!(timer.advance(-1.0), 0.0);
    }
}
