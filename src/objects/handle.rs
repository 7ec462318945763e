//! Generation-checked object handles
//!
//! Provides the single stable way to refer to a live game object.

use std::fmt;

/// A handle to an object stored in the [`Registry`](super::Registry).
///
/// A handle pairs a slot index with the generation of the slot at the time
/// the object was inserted. Once the object is destroyed the slot's generation
/// advances, so stale handles never alias a newer object that reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle {
    index: u32,
    generation: u32,
}

impl ObjectHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Get the slot index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Get the slot generation this handle was issued for.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
