//! Clock state shared with every hook

/// Fixed step used when no configuration overrides it, in seconds.
pub const DEFAULT_FIXED_DELTA_TIME: f64 = 0.02;

/// Frame timing state.
///
/// Only advances while a scene is running. Hooks read it through
/// [`Scene::time`](crate::core::Scene::time).
#[derive(Debug, Clone, PartialEq)]
pub struct Time {
    /// Seconds elapsed during the last frame
    delta_time: f64,
    /// Interval between fixed updates, in seconds
    fixed_delta_time: f64,
    /// Time accumulated since the last fixed update
    fixed_unscaled_delta_time: f64,
    /// Total elapsed seconds since the loop started
    time: f64,
    /// Frames completed since the loop started
    frame_count: u64,
}

impl Time {
    /// Create a cleared clock
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            fixed_unscaled_delta_time: 0.0,
            time: 0.0,
            frame_count: 0,
        }
    }

    /// Zero all counters and install the fixed step for the coming loop.
    pub fn reset(&mut self, fixed_delta_time: f64) {
        *self = Self {
            fixed_delta_time,
            ..Self::new()
        };
    }

    /// Record a frame that took `elapsed_ms` milliseconds.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.delta_time = elapsed_ms as f64 / 1000.0;
        self.frame_count += 1;
        self.time += self.delta_time;
        self.fixed_unscaled_delta_time += self.delta_time;
    }

    /// Returns true when a fixed update is due and empties the accumulator.
    ///
    /// Surplus time is discarded rather than carried over, so at most one
    /// fixed update happens per frame.
    pub fn consume_fixed_step(&mut self) -> bool {
        if self.fixed_unscaled_delta_time >= self.fixed_delta_time {
            self.fixed_unscaled_delta_time = 0.0;
            true
        } else {
            false
        }
    }

    /// Return every field to its default after the loop ends.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Seconds elapsed during the last frame
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Interval between fixed updates in seconds
    pub fn fixed_delta_time(&self) -> f64 {
        self.fixed_delta_time
    }

    /// Time accumulated toward the next fixed update
    pub fn fixed_unscaled_delta_time(&self) -> f64 {
        self.fixed_unscaled_delta_time
    }

    /// Total elapsed seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_defaults() {
        let time = Time::new();
        assert_eq!(time.delta_time(), 0.0);
        assert_eq!(time.frame_count(), 0);
        assert!((time.fixed_delta_time() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();
        time.advance(16);
        time.advance(17);

        assert_eq!(time.frame_count(), 2);
        assert!((time.delta_time() - 0.017).abs() < 1e-12);
        assert!((time.time() - 0.033).abs() < 1e-12);
        assert!((time.fixed_unscaled_delta_time() - 0.033).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_step_sequence() {
        let mut time = Time::new();
        time.reset(0.02);

        time.advance(10);
        assert!(!time.consume_fixed_step());
        assert!((time.fixed_unscaled_delta_time() - 0.01).abs() < 1e-12);

        time.advance(15);
        assert!(time.consume_fixed_step());
        assert_eq!(time.fixed_unscaled_delta_time(), 0.0);

        time.advance(50);
        assert!(time.consume_fixed_step());
        // Surplus is dropped, not carried into the next frame
        assert!(!time.consume_fixed_step());
        assert_eq!(time.fixed_unscaled_delta_time(), 0.0);
    }

    #[test]
    fn test_reset_and_clear() {
        let mut time = Time::new();
        time.reset(0.05);
        time.advance(100);
        assert!((time.fixed_delta_time() - 0.05).abs() < 1e-12);

        time.clear();
        assert_eq!(time, Time::new());
    }
}
