//! Loop statistics
//!
//! Collected by the scheduler from the frame durations the backend reports,
//! and logged when a loop ends.

use std::collections::VecDeque;
use std::time::Duration;

/// Frames kept for the rolling averages
const WINDOW: usize = 120;

/// Rolling frame statistics for one run of the loop.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Most recent frame durations, oldest first
    window: VecDeque<Duration>,
    fps: f32,
    avg_frame_time_ms: f32,
    min_frame_time_ms: f32,
    max_frame_time_ms: f32,
    total_frames: u64,
    total_time: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(WINDOW),
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
            total_time: Duration::ZERO,
        }
    }

    /// Record one frame of the given duration
    pub fn record_frame(&mut self, frame_time: Duration) {
        self.total_frames += 1;
        self.total_time += frame_time;

        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(frame_time);

        let (sum, min, max) = self.window.iter().fold(
            (Duration::ZERO, Duration::MAX, Duration::ZERO),
            |(sum, min, max), &dt| (sum + dt, min.min(dt), max.max(dt)),
        );

        let samples = self.window.len() as f32;
        let secs = sum.as_secs_f32();
        // Zero-length frames happen on the first tick
        if secs > 0.0 {
            self.avg_frame_time_ms = secs / samples * 1000.0;
            self.fps = samples / secs;
        } else {
            self.avg_frame_time_ms = 0.0;
            self.fps = 0.0;
        }
        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Frames per second over the rolling window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    pub fn min_frame_time_ms(&self) -> f32 {
        self.min_frame_time_ms
    }

    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    /// Frames recorded since the loop started
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Sum of every recorded frame duration
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// One-line summary for logs
    pub fn format_stats(&self) -> String {
        format!(
            "{} frames, {:.1} fps, {:.2}ms avg (min {:.2}, max {:.2})",
            self.total_frames,
            self.fps,
            self.avg_frame_time_ms,
            self.min_frame_time_ms,
            self.max_frame_time_ms
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frames() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10));
        stats.record_frame(Duration::from_millis(30));

        assert_eq!(stats.total_frames(), 2);
        assert_eq!(stats.total_time(), Duration::from_millis(40));
        assert!((stats.avg_frame_time_ms() - 20.0).abs() < 0.01);
        assert!((stats.fps() - 50.0).abs() < 0.01);
        assert!((stats.min_frame_time_ms() - 10.0).abs() < 0.01);
        assert!((stats.max_frame_time_ms() - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_length_frames() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::ZERO);

        assert_eq!(stats.total_frames(), 1);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(100));
        for _ in 0..WINDOW {
            stats.record_frame(Duration::from_millis(10));
        }

        assert_eq!(stats.total_frames(), WINDOW as u64 + 1);
        assert!((stats.max_frame_time_ms() - 10.0).abs() < 0.01);
    }
}
