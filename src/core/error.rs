//! Error types for scene operations

use thiserror::Error;

use crate::backend::BackendError;
use crate::objects::ObjectHandle;

/// Error returned by a failing hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every [`GameObject`](crate::objects::GameObject) hook.
pub type HookResult = std::result::Result<(), HookError>;

/// The main error type for scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Hook `{handler}` failed: {source}")]
    Hook {
        handler: String,
        #[source]
        source: HookError,
    },

    #[error("Object not found: {0}")]
    UnknownObject(ObjectHandle),

    #[error("Scene is already running")]
    AlreadyRunning,

    #[error("Scene is borrowed by a running loop")]
    Busy,
}

impl SceneError {
    pub(crate) fn hook(handler: impl Into<String>, source: HookError) -> Self {
        Self::Hook {
            handler: handler.into(),
            source,
        }
    }
}

/// Result type alias for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
