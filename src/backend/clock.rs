//! Monotonic frame clock with an optional rate cap

use std::time::{Duration, Instant};

/// Measures the time between frames and sleeps to honor a frame rate cap.
#[derive(Debug, Clone, Default)]
pub struct FrameLimiter {
    last: Option<Instant>,
}

impl FrameLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous tick; the next one reports zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Minimum frame duration for a cap, `None` when uncapped
    pub fn frame_budget(frame_rate_cap: Option<u32>) -> Option<Duration> {
        frame_rate_cap
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
    }

    /// Milliseconds since the previous tick, sleeping first so that frames
    /// last at least `1 / frame_rate_cap` seconds.
    pub fn tick(&mut self, frame_rate_cap: Option<u32>) -> u64 {
        let Some(last) = self.last else {
            self.last = Some(Instant::now());
            return 0;
        };

        if let Some(budget) = Self::frame_budget(frame_rate_cap) {
            let spent = last.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        self.last = Some(now);
        now.saturating_duration_since(last).as_millis() as u64
    }
}
