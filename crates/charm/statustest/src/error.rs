//! Error types for the status test charm.

use charm_status::StatusError;
use thiserror::Error;

use crate::host::EventKind;

/// Errors raised while loading config or dispatching events.
#[derive(Debug, Error)]
pub enum CharmError {
    /// An observer failed while handling an event.
    #[error("handler for {event} failed: {source}")]
    Handler {
        event: EventKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid charm config or settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Status registry error.
    #[error("status error: {0}")]
    Status(#[from] StatusError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for charm operations.
pub type CharmResult<T> = Result<T, CharmError>;
