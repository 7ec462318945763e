//! A game-object lifecycle scheduler
//!
//! This crate provides:
//! - A frame loop that drives Unity-style hooks (`awake`, `start`, `update`,
//!   `fixed_update`, `late_update`, `draw`, `on_destroy`) on every object
//! - A fixed-step clock alongside the variable frame clock
//! - Immediate and end-of-frame object destruction
//! - A windowed backend on winit + wgpu, and a scripted headless one

pub mod backend;
pub mod core;
pub mod objects;
pub mod renderer;

pub use crate::core::scene;

// Re-exports for convenience
pub use glam;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    #[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
    pub use crate::backend::DesktopBackend;
    pub use crate::backend::{Backend, BackendError, HeadlessBackend};
    pub use crate::core::{
        scene, Config, Event, HookResult, KeyEvent, MouseButtonEvent, MouseMotionEvent,
        MouseWheelEvent, Scene, SceneError, ScreenFlags, SharedScene, Time,
    };
    pub use crate::objects::{GameObject, ObjectHandle};
    pub use crate::renderer::{Canvas, Color};
    pub use glam::Vec2;
    pub use winit::event::MouseButton;
    pub use winit::keyboard::KeyCode;
}
