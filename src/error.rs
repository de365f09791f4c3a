//! Error types for the DB2 adapter.
//!
//! This module defines all error types using `thiserror`. The taxonomy
//! distinguishes fatal configuration errors, not-found guards, and driver
//! errors carrying a SQLSTATE. Only two SQLSTATEs are ever recovered from
//! (object-exists on define, object-not-found on drop); everything else
//! propagates to the caller unmodified.

use thiserror::Error;

/// SQLSTATE reported by the DB2 CLI driver when a CREATE targets an
/// existing table.
pub const SQLSTATE_TABLE_EXISTS: &str = "42S01";

/// SQLSTATE reported when a DROP targets a missing table.
pub const SQLSTATE_TABLE_NOT_FOUND: &str = "42S02";

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Connection configuration has no identity")]
    MissingIdentity,

    #[error("Connection '{identity}' is already registered")]
    DuplicateIdentity { identity: String },

    #[error("Connection not registered: {identity}")]
    ConnectionNotFound { identity: String },

    #[error("Collection '{collection}' is not defined on connection '{identity}'")]
    CollectionNotFound { identity: String, collection: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42S01" for table already exists
        sql_state: Option<String>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AdapterError {
    /// Create a duplicate identity error.
    pub fn duplicate_identity(identity: impl Into<String>) -> Self {
        Self::DuplicateIdentity {
            identity: identity.into(),
        }
    }

    /// Create a connection not found error.
    pub fn connection_not_found(identity: impl Into<String>) -> Self {
        Self::ConnectionNotFound {
            identity: identity.into(),
        }
    }

    /// Create a collection not found error.
    pub fn collection_not_found(
        identity: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self::CollectionNotFound {
            identity: identity.into(),
            collection: collection.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a database error with optional SQLSTATE.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the SQLSTATE for this error, if the driver reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Database { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }

    /// True when the driver reported "table already exists".
    ///
    /// This is the recovery condition for idempotent `define`.
    pub fn is_table_exists(&self) -> bool {
        self.sql_state() == Some(SQLSTATE_TABLE_EXISTS)
    }

    /// True when the driver reported "table not found".
    ///
    /// This is the recovery condition for idempotent `drop`.
    pub fn is_table_missing(&self) -> bool {
        self.sql_state() == Some(SQLSTATE_TABLE_NOT_FOUND)
    }
}

/// Result type alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
