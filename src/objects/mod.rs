//! Game objects and their registry
//!
//! Objects are trait objects owned by the scene's [`Registry`] and addressed
//! through generation-checked [`ObjectHandle`]s.

mod handle;
mod object;
mod registry;

#[cfg(test)]
pub(crate) mod recorder;

pub use handle::ObjectHandle;
pub use object::GameObject;
pub use registry::{Lifecycle, Registry};

pub(crate) use registry::{Sweep, Teardown};
