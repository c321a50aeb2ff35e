//! Patter error types
//!
//! Deliberately small: backend unavailability, timeouts, and queue-full
//! backpressure are ordinary control flow inside the broker (availability
//! check, worker-side `tokio::time::timeout`, bool-typed enqueue), not
//! error values. The only errors that exist as values are what a backend
//! can return and what the builder can reject.

/// Patter error types
#[derive(Debug, thiserror::Error)]
pub enum PatterError {
    /// Backend failed to produce text.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("no backend configured")]
    NoBackend,

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Patter operations
pub type Result<T> = std::result::Result<T, PatterError>;
