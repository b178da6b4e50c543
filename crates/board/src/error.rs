use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching the post list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a non-success status code.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Local post file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The body was not a JSON array.
    #[error("failed to decode post list: {0}")]
    Decode(String),
    /// No answer within the configured timeout.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    /// The fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

/// A color string that is not `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}; expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// The session task is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("board session has shut down")]
pub struct SessionClosed;
