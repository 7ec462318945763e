//! Scene configuration
//!
//! Settings are read when [`Scene::run`](crate::core::Scene::run) starts.
//! Configurations can be saved and loaded in RON (Rusty Object Notation) or JSON.

use std::fs;
use std::ops::{BitOr, BitOrAssign};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::time::DEFAULT_FIXED_DELTA_TIME;
use crate::renderer::Color;

/// Display surface flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenFlags(u32);

impl ScreenFlags {
    /// Cover the whole target display
    pub const FULLSCREEN: Self = Self(1 << 0);
    /// Let the user resize the window
    pub const RESIZABLE: Self = Self(1 << 1);
    /// No window decorations
    pub const NOFRAME: Self = Self(1 << 2);
    /// Start with the window hidden
    pub const HIDDEN: Self = Self(1 << 3);

    /// No flags set
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build flags from a raw bitmask
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bitmask
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether every bit of `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ScreenFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScreenFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window title
    pub title: String,
    /// Surface size as `(width, height)`
    pub screen_size: (u32, u32),
    /// Surface flags
    pub screen_flags: ScreenFlags,
    /// Color bit depth (0 = pick automatically)
    pub screen_depth: u32,
    /// Index of the display to open the surface on
    pub screen_display: usize,
    /// Frame rate cap (zero or negative for unlimited)
    pub target_frame_rate: i32,
    /// Color the surface is cleared to each frame (`None` keeps the previous frame)
    pub background_color: Option<Color>,
    /// Interval between fixed updates, in seconds
    pub fixed_delta_time: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::from("frameloop"),
            screen_size: (640, 480),
            screen_flags: ScreenFlags::empty(),
            screen_depth: 0,
            screen_display: 0,
            target_frame_rate: -1,
            background_color: Some(Color::WHITE),
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
        }
    }
}

impl Config {
    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set surface dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.screen_size = (width, height);
        self
    }

    /// Set surface flags
    pub fn with_flags(mut self, flags: ScreenFlags) -> Self {
        self.screen_flags = flags;
        self
    }

    /// Select the target display
    pub fn with_display(mut self, display: usize) -> Self {
        self.screen_display = display;
        self
    }

    /// Set the frame rate cap
    pub fn with_target_frame_rate(mut self, fps: i32) -> Self {
        self.target_frame_rate = fps;
        self
    }

    /// Set or remove the background clear color
    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    /// Set the fixed update interval
    pub fn with_fixed_delta_time(mut self, seconds: f64) -> Self {
        self.fixed_delta_time = seconds;
        self
    }

    /// The frame rate cap, `None` when unbounded
    #[must_use]
    pub fn frame_rate_cap(&self) -> Option<u32> {
        u32::try_from(self.target_frame_rate)
            .ok()
            .filter(|&fps| fps > 0)
    }

    /// Save the configuration to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the configuration to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }
}

/// Errors that can occur while loading or saving a configuration
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),

    #[error("Deserialization error: {0}")]
    DeserializeError(String),
}
