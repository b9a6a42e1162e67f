//! Error types for suuid_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for suuid_core operations.
#[derive(Error, Debug)]
pub enum SuuidError {
    /// The string is not a canonical lowercase version 1 UUID.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The string does not have the `YYYY-MM-DDTHH:MM:SS.NNNNNNNZ` shape.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Input bytes for a field are not well-formed UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Name of the offending field (e.g. "comment", "tag")
        field: &'static str,
    },

    /// Input for a field contains control characters that cannot be logged.
    #[error("{field} contains illegal characters")]
    IllegalCharacters {
        /// Name of the offending field
        field: &'static str,
    },

    /// An entry already carries the maximum number of tags.
    #[error("too many tags: limit is {limit}")]
    TooManyTags {
        /// Maximum number of tags per entry
        limit: usize,
    },

    /// A log file operation was attempted in the wrong state.
    #[error("invalid log state: cannot {operation} while {state}")]
    InvalidLogState {
        /// The attempted operation
        operation: &'static str,
        /// The state the handle was in
        state: String,
    },

    /// I/O error on the log file.
    #[error("log file {}: {}", path.display(), source)]
    LogIo {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A generation run stopped before producing every requested UUID.
    #[error("run failed after {produced} of {requested} UUIDs: {source}")]
    RunFailed {
        /// Number of UUIDs written to the log before the failure
        produced: usize,
        /// Number of UUIDs requested
        requested: usize,
        /// The error that stopped the run
        #[source]
        source: Box<SuuidError>,
    },
}

impl SuuidError {
    /// Returns true for errors caused by bad input rather than by resources.
    ///
    /// Validation errors never touch data already written to the log.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidUuid(_)
            | Self::InvalidTimestamp(_)
            | Self::InvalidUtf8 { .. }
            | Self::IllegalCharacters { .. }
            | Self::TooManyTags { .. } => true,
            Self::RunFailed { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUuid(_) => {
                Some("Only lowercase version 1 UUIDs (xxxxxxxx-xxxx-1xxx-xxxx-xxxxxxxxxxxx) are accepted.")
            }
            Self::IllegalCharacters { .. } => {
                Some("Remove control characters; only newline and tab are allowed.")
            }
            Self::TooManyTags { .. } => Some("Use fewer tags for a single entry."),
            Self::LogIo { .. } => {
                Some("Check that the log directory exists and is writable, or set SUUID_LOGDIR.")
            }
            Self::ConfigError(_) => Some("Fix or remove the rc file (default ~/.suuidrc)."),
            Self::RunFailed { source, .. } => source.recovery_suggestion(),
            _ => None,
        }
    }

    pub(crate) fn log_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogIo {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type for suuid_core operations.
pub type Result<T> = std::result::Result<T, SuuidError>;
