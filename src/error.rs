//! Error types exposed at the edges of the synchroniser.
//!
//! Query-string updates themselves are total; these errors only arise while
//! parsing a starting location, decoding an event payload handed over as
//! text, loading configuration, or writing CLI output.

use thiserror::Error;

/// Errors surfaced while preparing or reporting a URL update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// No starting URL was configured.
    #[error("a starting URL is required (use --url or -u)")]
    MissingUrl,

    /// The starting location could not be parsed.
    #[error("location URL is invalid: {0}")]
    InvalidUrl(String),

    /// The filter event payload was not a JSON object.
    #[error("filter event payload is invalid: {message}")]
    InvalidFilterEvent {
        /// Decoder detail describing why the payload was rejected.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
