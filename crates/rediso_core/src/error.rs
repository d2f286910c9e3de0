//! Error types for rediso core.

use crate::types::RecordId;
use std::fmt;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Broad classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required parameter was missing, empty or reserved.
    Validation,
    /// A referenced field or record does not exist.
    NotFound,
    /// A backing-store primitive failed.
    BackingStore,
    /// A query was configured with an unknown operator or order.
    Configuration,
    /// A stored document could not be encoded or decoded.
    Codec,
    /// Opening the session failed.
    Connection,
}

/// Stage of session setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStage {
    /// Password authentication.
    Auth,
    /// Logical database selection.
    Select,
    /// Reachability check.
    Ping,
}

impl fmt::Display for ConnectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionStage::Auth => "auth",
            ConnectionStage::Select => "select",
            ConnectionStage::Ping => "ping",
        })
    }
}

/// Errors that can occur in rediso core operations.
///
/// Every variant carries the name of the operation that failed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or empty parameter, or a reserved field supplied by the caller.
    #[error("{operation}: {message}")]
    Validation {
        /// The failing operation.
        operation: &'static str,
        /// What was wrong with the input.
        message: String,
    },

    /// A record lacks a field the operation needs.
    #[error("{operation}: field `{field}` not found")]
    FieldNotFound {
        /// The failing operation.
        operation: &'static str,
        /// The missing field.
        field: String,
    },

    /// No record with this id exists in the collection.
    #[error("record {id} not found in collection {collection}")]
    RecordNotFound {
        /// The collection searched.
        collection: String,
        /// The missing id.
        id: RecordId,
    },

    /// A backing-store primitive failed.
    #[error("{operation}: backing store error: {source}")]
    BackingStore {
        /// The failing operation.
        operation: &'static str,
        /// The store's error.
        #[source]
        source: rediso_storage::StorageError,
    },

    /// Unknown predicate operator or sort order.
    #[error("{operation}: {message}")]
    Configuration {
        /// The failing operation.
        operation: &'static str,
        /// Description of the bad setting.
        message: String,
    },

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] rediso_codec::CodecError),

    /// Session setup failed.
    #[error("connection failed at {stage}: {source}")]
    Connection {
        /// The setup step that failed.
        stage: ConnectionStage,
        /// The store's error.
        #[source]
        source: rediso_storage::StorageError,
    },
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: message.into(),
        }
    }

    /// Creates a field-not-found error.
    pub fn field_not_found(operation: &'static str, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            operation,
            field: field.into(),
        }
    }

    /// Creates a record-not-found error.
    pub fn record_not_found(collection: impl Into<String>, id: RecordId) -> Self {
        Self::RecordNotFound {
            collection: collection.into(),
            id,
        }
    }

    /// Creates a backing-store error.
    pub fn backing_store(operation: &'static str, source: rediso_storage::StorageError) -> Self {
        Self::BackingStore { operation, source }
    }

    /// Creates a configuration error.
    pub fn configuration(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            operation,
            message: message.into(),
        }
    }

    /// Returns the error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::FieldNotFound { .. } | Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::BackingStore { .. } => ErrorKind::BackingStore,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Connection { .. } => ErrorKind::Connection,
        }
    }
}
