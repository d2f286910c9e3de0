//! Error types for backing-store operations.

use thiserror::Error;

/// Result type for backing-store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors a backing-store primitive can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The key addressed by the command does not exist.
    #[error("no such key: {key}")]
    NoSuchKey {
        /// The missing key.
        key: String,
    },

    /// The supplied password was rejected.
    #[error("authentication failed")]
    AuthFailed,

    /// A command was issued before authenticating.
    #[error("authentication required")]
    NoAuth,

    /// The requested logical database does not exist.
    #[error("invalid database index {index} (store has {count})")]
    InvalidDatabase {
        /// The requested index.
        index: u32,
        /// Number of databases the store provides.
        count: u32,
    },

    /// The store is closed or unreachable.
    #[error("store is closed")]
    Closed,

    /// A command failed for a store-specific reason.
    #[error("{command} failed: {message}")]
    CommandFailed {
        /// Name of the failing command.
        command: &'static str,
        /// Description of the failure.
        message: String,
    },
}

impl StorageError {
    /// Creates a no-such-key error.
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::NoSuchKey { key: key.into() }
    }

    /// Creates a generic command failure.
    pub fn command_failed(command: &'static str, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command,
            message: message.into(),
        }
    }
}
