//! Error types for the chime library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all scheduling and snooze operations.
#[derive(Error, Debug)]
pub enum ChimeError {
    /// Key-value store backend errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A fire date could not be constructed from the step's parameters
    #[error("Scheduling error: {message}")]
    Scheduling { message: String },
    /// Stack not found for the given ID
    #[error("Stack '{id}' not found")]
    StackNotFound { id: String },
    /// Step not found (or no longer active) for the given ID
    #[error("Step '{id}' not found")]
    StepNotFound { id: String },
    /// The step has snoozing disabled
    #[error("Step '{id}' does not allow snoozing")]
    SnoozeNotAllowed { id: String },
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
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
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
    pub fn with_source(self, source: rusqlite::Error) -> ChimeError {
        ChimeError::Database {
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
    pub fn with_reason(self, reason: impl Into<String>) -> ChimeError {
        ChimeError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ChimeError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a scheduling error from a message.
    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::Scheduling {
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
        self.map_err(|e| ChimeError::database(message).with_source(e))
    }
}

/// Specialized extension trait for calendar arithmetic Results.
pub trait ScheduleResultExt<T> {
    /// Map calendar errors to a scheduling error with a message.
    fn schedule_context(self, message: &str) -> Result<T>;
}

impl<T> ScheduleResultExt<T> for std::result::Result<T, jiff::Error> {
    fn schedule_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ChimeError::scheduling(format!("{message}: {e}")))
    }
}

/// Result type alias for chime operations
pub type Result<T> = std::result::Result<T, ChimeError>;
