//! Error types for the tessera library.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Comprehensive error type for all store, planning and execution operations.
#[derive(Error, Debug)]
pub enum TesseraError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: Uuid },
    /// Step not found for the given ID
    #[error("Step with ID {id} not found")]
    StepNotFound { id: Uuid },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// No handler accepted a step for the named agent
    #[error("No agent registered under '{name}'")]
    UnknownAgent { name: String },
    /// An agent handler failed while processing a step
    #[error("Agent '{agent}' failed: {message}")]
    Dispatch { agent: String, message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TesseraError {
        TesseraError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TesseraError {
        TesseraError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TesseraError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a configuration error from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a dispatch error for the given agent.
    pub fn dispatch(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dispatch {
            agent: agent.into(),
            message: message.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TesseraError::database(message).with_source(e))
    }
}

/// Maps a blocking task join failure into a configuration error.
pub(crate) fn join_error(e: tokio::task::JoinError) -> TesseraError {
    TesseraError::Configuration {
        message: format!("Task join error: {e}"),
    }
}

/// Result type alias for tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;
