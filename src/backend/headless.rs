//! Scripted backend without a display
//!
//! Each scripted frame carries the events delivered at its start and the
//! milliseconds its tick reports. A frame is consumed when its events are
//! polled, even if a quit among them means the tick never comes. Once the
//! script runs out, a [`Event::Quit`] ends the loop.

use std::collections::VecDeque;

use super::{Backend, BackendError};
use crate::core::{Config, Event};
use crate::renderer::Canvas;

#[derive(Debug, Clone)]
struct ScriptedFrame {
    events: Vec<Event>,
    elapsed_ms: u64,
}

/// Deterministic backend for tests and embedding.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    script: VecDeque<ScriptedFrame>,
    /// Elapsed time of the last polled frame, reported by the next tick
    next_tick: Option<u64>,
    canvas: Canvas,
    init_failure: Option<String>,
    initialized: bool,
    inits: u32,
    presented_frames: u64,
    shutdowns: u32,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame to the script
    #[must_use]
    pub fn frame(mut self, events: Vec<Event>, elapsed_ms: u64) -> Self {
        self.push_frame(events, elapsed_ms);
        self
    }

    /// Append `count` frames without events
    #[must_use]
    pub fn idle_frames(mut self, count: usize, elapsed_ms: u64) -> Self {
        for _ in 0..count {
            self.push_frame(Vec::new(), elapsed_ms);
        }
        self
    }

    /// Make [`Backend::init`] fail with a window error
    #[must_use]
    pub fn fail_init(mut self, reason: impl Into<String>) -> Self {
        self.init_failure = Some(reason.into());
        self
    }

    /// Append a frame to the script, also usable between runs
    pub fn push_frame(&mut self, events: Vec<Event>, elapsed_ms: u64) {
        self.script.push_back(ScriptedFrame { events, elapsed_ms });
    }

    /// Frames left in the script
    pub fn frames_remaining(&self) -> usize {
        self.script.len()
    }

    /// Successful calls to `init`
    pub fn inits(&self) -> u32 {
        self.inits
    }

    /// Frames presented across all runs
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    /// Calls to `shutdown`
    pub fn shutdowns(&self) -> u32 {
        self.shutdowns
    }

    /// Last canvas contents
    pub fn canvas_ref(&self) -> &Canvas {
        &self.canvas
    }
}

impl Backend for HeadlessBackend {
    fn init(&mut self, config: &Config) -> Result<(), BackendError> {
        if let Some(reason) = &self.init_failure {
            return Err(BackendError::Window(reason.clone()));
        }

        let (width, height) = config.screen_size;
        self.canvas.resize(width, height);
        self.initialized = true;
        self.inits += 1;
        log::info!(
            "Headless backend ready ({}x{}, {} scripted frames)",
            width,
            height,
            self.script.len()
        );
        Ok(())
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        match self.script.pop_front() {
            Some(mut frame) => {
                events.append(&mut frame.events);
                self.next_tick = Some(frame.elapsed_ms);
            }
            None => events.push(Event::Quit),
        }
    }

    fn tick(&mut self, _frame_rate_cap: Option<u32>) -> u64 {
        self.next_tick.take().unwrap_or(0)
    }

    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if !self.initialized {
            return Err(BackendError::Surface("present before init".to_string()));
        }
        self.presented_frames += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
        self.next_tick = None;
        self.shutdowns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_quit() {
        let mut backend = HeadlessBackend::new()
            .frame(vec![Event::WindowFocus(true)], 16)
            .idle_frames(1, 20);
        backend.init(&Config::default()).unwrap();

        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(backend.tick(None), 16);

        events.clear();
        backend.poll_events(&mut events);
        assert!(events.is_empty());
        assert_eq!(backend.tick(Some(60)), 20);

        backend.poll_events(&mut events);
        assert!(events[0].is_quit());
        assert_eq!(backend.frames_remaining(), 0);
    }

    #[test]
    fn test_quit_frame_is_consumed() {
        let mut backend = HeadlessBackend::new()
            .frame(vec![Event::Quit], 16)
            .idle_frames(1, 20);
        backend.init(&Config::default()).unwrap();

        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert!(events[0].is_quit());
        assert_eq!(backend.frames_remaining(), 1);
        backend.shutdown();

        // The next run starts at the idle frame
        backend.init(&Config::default()).unwrap();
        events.clear();
        backend.poll_events(&mut events);
        assert!(events.is_empty());
        assert_eq!(backend.tick(None), 20);
        assert_eq!(backend.frames_remaining(), 0);
    }

    #[test]
    fn test_canvas_sized_from_config() {
        let mut backend = HeadlessBackend::new();
        backend.init(&Config::default().with_size(32, 8)).unwrap();
        assert_eq!(backend.canvas().size(), (32, 8));
    }

    #[test]
    fn test_present_requires_init() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.present().is_err());

        backend.init(&Config::default()).unwrap();
        backend.present().unwrap();
        backend.shutdown();

        assert_eq!(backend.presented_frames(), 1);
        assert_eq!(backend.shutdowns(), 1);
        assert!(backend.present().is_err());
    }

    #[test]
    fn test_init_failure() {
        let mut backend = HeadlessBackend::new().fail_init("no display");
        let err = backend.init(&Config::default()).unwrap_err();
        assert!(matches!(err, BackendError::Window(ref reason) if reason == "no display"));
        assert_eq!(backend.inits(), 0);
    }
}
