//! Error types for charm-status crate.
//!
//! Defines registry, evaluation, and persistence errors.

use thiserror::Error;

/// Errors that can occur while registering, evaluating, or persisting statuses.
#[derive(Debug, Error)]
pub enum StatusError {
    /// A component with this name is already registered.
    #[error("duplicate component {0:?}")]
    DuplicateComponent(String),

    /// No component with this name is registered.
    #[error("component not found: {0:?}")]
    ComponentNotFound(String),

    /// Component names must be non-empty.
    #[error("component name must not be empty")]
    InvalidComponentName,

    /// Computing a component's current status failed.
    #[error("status evaluation failed for component {component:?}: {reason}")]
    ComponentEvaluation { component: String, reason: String },

    /// Severity token outside the host status vocabulary.
    #[error("unknown severity: {0:?}")]
    UnknownSeverity(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Status store rejected the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// IO error from a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted status data could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for status operations.
pub type StatusResult<T> = Result<T, StatusError>;
