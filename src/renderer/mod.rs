//! Rendering module
//!
//! CPU-side draw surface handed to `draw` hooks. Backends present it.

mod canvas;

pub use canvas::{Canvas, ChannelOrder, Color};
