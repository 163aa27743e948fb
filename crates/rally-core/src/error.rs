//! Error type shared by the store, the engine parsers and the planner
//! facade.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure a Rally operation can report.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// SQLite failure, with the operation that hit it
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Activity with ID {id} not found")]
    ActivityNotFound { id: u64 },
    #[error("Participant with ID {id} not found")]
    ParticipantNotFound { id: u64 },
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Creating the database directory failed
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No XDG data directory could be determined
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// A request field failed validation
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// A value the engine cannot interpret, such as an unparsable clock time
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Cannot move plan from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },
    /// Stored JSON (schedules) could not be read or written
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Unknown question bank version, or a background task that died
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Pairs a database error message with its rusqlite source.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Names the invalid field before the reason is known.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// `PlannerError::database("Failed to load plan").with_source(e)`
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// `PlannerError::invalid_input("feedback").with_reason("must not be empty")`
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an invalid parameter error for engine inputs.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// A `spawn_blocking` task panicked or was cancelled.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Background task failed: {error}"),
        }
    }
}

/// Attaches an operation message to rusqlite results.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Result type alias for Rally operations
pub type Result<T> = std::result::Result<T, PlannerError>;
