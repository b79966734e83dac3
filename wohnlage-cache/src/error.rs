//! Error types raised by the geocode cache and score history.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while opening or querying the cache database.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Creating the parent directory for the database failed.
    #[error("failed to create parent directory for {path}")]
    CreateParent {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening the `SQLite` database failed.
    #[error("failed to open SQLite database at {path}")]
    OpenDatabase {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a statement failed.
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A cached place could not be encoded or decoded.
    #[error("failed to encode or decode cached place")]
    Codec(#[source] serde_json::Error),
    /// A stored timestamp is outside the representable range.
    #[error("stored timestamp {millis} ms is out of range")]
    InvalidTimestamp {
        /// Raw value read from `SQLite`.
        millis: i64,
    },
    /// A stored score is outside `0..=10`.
    #[error("stored score {raw} is out of range")]
    InvalidScore {
        /// Raw value read from `SQLite`.
        raw: i64,
    },
    /// Another thread panicked while holding the connection.
    #[error("cache connection lock poisoned")]
    Poisoned,
    /// Closing the connection failed.
    #[error("failed to close SQLite database")]
    Close(#[source] rusqlite::Error),
}
