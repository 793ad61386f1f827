//! Error types for the bed planning library.
//!
//! Scheduling conflicts, window violations and capacity shortfalls are not
//! errors: the engines return them as structured values. [`PlannerError`]
//! covers persistence, catalog lookups and malformed input.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a planner operation.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// SQLite failure while reading or writing committed occupations
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Crop '{id}' not found in catalog")]
    CropNotFound { id: String },
    #[error("Climate zone '{id}' not found in catalog")]
    ZoneNotFound { id: String },
    #[error("Garden '{id}' not found in inventory")]
    GardenNotFound { id: String },
    /// No committed occupation carries the series ID
    #[error("Series '{id}' not found")]
    SeriesNotFound { id: String },
    /// Catalog file or database directory could not be read or created
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The default data directory could not be resolved
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// A week, bed index or identifier that no plan can use
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Malformed catalog JSON
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// The database was written by a newer schema version, or the background
    /// worker running a database operation failed
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Pending [`PlannerError::InvalidInput`] waiting for its reason.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Pending [`PlannerError::Database`] waiting for the underlying failure.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

impl PlannerError {
    /// Starts a database error described by `message`.
    ///
    /// ```
    /// use bedplan_core::PlannerError;
    ///
    /// let err = PlannerError::database("Failed to insert occupation")
    ///     .with_source(rusqlite::Error::QueryReturnedNoRows);
    /// assert_eq!(err.to_string(), "Database error: Failed to insert occupation");
    /// assert!(std::error::Error::source(&err).is_some());
    /// ```
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder {
            message: message.into(),
        }
    }

    /// Starts an input error for `field`.
    ///
    /// ```
    /// use bedplan_core::PlannerError;
    ///
    /// let err = PlannerError::invalid_input("first_bed").with_reason("beds start at 1");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid input for field 'first_bed': beds start at 1"
    /// );
    /// ```
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder {
            field: field.into(),
        }
    }

    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

/// Attaches a message to `rusqlite` failures.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|source| PlannerError::database(message).with_source(source))
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
