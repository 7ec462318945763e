//! Core scheduling module
//!
//! Contains the [`Scene`] context, its frame loop and configuration

mod config;
mod debug;
mod engine;
pub(crate) mod error;
pub(crate) mod events;
mod scene;
mod singleton;
mod time;

pub use config::{Config, ConfigError, ScreenFlags};
pub use debug::FrameStats;
pub use engine::SchedulerState;
pub use error::{HookError, HookResult, Result, SceneError};
pub use events::{
    Event, EventQueue, KeyEvent, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent,
};
pub use scene::Scene;
pub use singleton::{scene, SharedScene};
pub use time::{Time, DEFAULT_FIXED_DELTA_TIME};
