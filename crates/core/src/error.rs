//! Error types for the Parley domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Only two kinds cross
//! the orchestrator boundary as failures: `Validation` (a malformed request,
//! never retried) and `Internal` (anything unanticipated, surfaced opaquely).
//! Every other failure — a plugin that could not produce a result, an
//! unreachable weather API — is absorbed locally and converted into a
//! best-effort textual reply.

use thiserror::Error;

/// The top-level error type for all Parley operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request field is missing or empty (4xx-equivalent).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything unanticipated (5xx-equivalent, detail never leaked to callers).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error should map to a client fault (as opposed to a
    /// server fault) at the transport boundary.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
