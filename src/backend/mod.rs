//! Platform backends
//!
//! A [`Backend`] supplies everything the frame loop needs from the outside
//! world: a display surface, input events, and a frame clock. The loop calls
//! it in this order each frame:
//!
//! ```text
//! poll_events ─► tick ─► (hooks) ─► canvas ─► present
//! ```

mod clock;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
mod desktop;
mod headless;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
mod presenter;

use thiserror::Error;

use crate::core::{Config, Event};
use crate::renderer::Canvas;

pub use clock::FrameLimiter;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub use desktop::DesktopBackend;
pub use headless::HeadlessBackend;

/// Errors raised by a backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Graphics error: {0}")]
    Graphics(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Display, input, and clock used by [`Scene::run`](crate::core::Scene::run).
pub trait Backend {
    /// Open the display described by `config`.
    ///
    /// Called once per run, before any hook.
    ///
    /// # Errors
    ///
    /// Fails when the display or graphics device cannot be created.
    fn init(&mut self, config: &Config) -> Result<(), BackendError>;

    /// Append the events received since the last poll, in arrival order.
    fn poll_events(&mut self, events: &mut Vec<Event>);

    /// Mark the start of a frame and return the milliseconds since the
    /// previous one, waiting first if `frame_rate_cap` would be exceeded.
    fn tick(&mut self, frame_rate_cap: Option<u32>) -> u64;

    /// Surface that `draw` hooks paint on
    fn canvas(&mut self) -> &mut Canvas;

    /// Show the canvas.
    ///
    /// # Errors
    ///
    /// Fails when the frame cannot be presented.
    fn present(&mut self) -> Result<(), BackendError>;

    /// Close the display. Called after every successful `init`, whether or
    /// not the run that followed succeeded.
    fn shutdown(&mut self);
}
