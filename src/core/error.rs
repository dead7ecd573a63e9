//! Engine error types

use thiserror::Error;

/// Errors that can occur in the permission engine
///
/// Precondition faults (`NotInitialised`, `Invalidated`, `AlreadyInitialised`,
/// `InvalidArgument`) indicate a caller or lifecycle bug and are never
/// retried. Data faults (`DataStore`, `ContextResolution`) come from the
/// external collaborators and propagate to the caller unretried.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Session has not been initialised
    #[error("session has not been initialised")]
    NotInitialised,

    /// Session has been invalidated
    #[error("session has been invalidated")]
    Invalidated,

    /// Session is already initialised
    #[error("session is already initialised")]
    AlreadyInitialised,

    /// Invalid argument passed by the caller
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The permission data store is unreachable or returned corrupt data
    #[error("permission data store error: {0}")]
    DataStore(String),

    /// The context manager failed to resolve the entity's context
    #[error("context resolution error: {0}")]
    ContextResolution(String),
}

impl EngineError {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        EngineError::InvalidArgument(msg.into())
    }

    /// Create a data-store error
    pub fn data_store(msg: impl Into<String>) -> Self {
        EngineError::DataStore(msg.into())
    }

    /// Create a context-resolution error
    pub fn context_resolution(msg: impl Into<String>) -> Self {
        EngineError::ContextResolution(msg.into())
    }

    /// Whether this is a precondition fault (caller/lifecycle bug)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::NotInitialised
                | EngineError::Invalidated
                | EngineError::AlreadyInitialised
                | EngineError::InvalidArgument(_)
        )
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
