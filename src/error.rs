//! Centralized error handling for the lottery API generator.
//!
//! Two kinds of failure exist in a generation run:
//!
//! - **Fatal** conditions (no source file, no header row, unknown mapping)
//!   abort the run and surface to the caller as a [`LotteryApiError`].
//! - **Per-row** conditions (missing fields, unparseable cells, a row that
//!   cannot be written) are logged and counted in the run report; they never
//!   reach the caller.
//!
//! ```no_run
//! use lottery_api::error::{LotteryApiError, Result, ResultExt as _};
//! use std::fs;
//!
//! fn read_source(path: &str) -> Result<String> {
//!     let content = fs::read_to_string(path).context("Failed to read source")?;
//!     Ok(content)
//! }
//!
//! match read_source("federal.csv") {
//!     Err(LotteryApiError::MissingHeader(path)) => eprintln!("no headers in {path}"),
//!     Err(e) => eprintln!("{e}"),
//!     Ok(_) => {}
//! }
//! ```

use std::fmt;

/// Main error type for lottery API operations.
#[derive(Debug)]
pub enum LotteryApiError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// The CSV source file does not exist
    SourceNotFound(String),

    /// The CSV source has no usable header row
    MissingHeader(String),

    /// Mapping type name not present in the mapper table
    UnknownMapping {
        name: String,
        available: Vec<&'static str>,
    },

    /// Structural CSV decoding errors
    Csv(String),

    /// JSON serialization or parsing errors
    Json(String),

    /// Record identifier that cannot be used as a file name
    InvalidRecordId(String),

    /// Configuration errors
    Config(String),

    /// Upstream result document could not be converted
    Upstream(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for LotteryApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::SourceNotFound(path) => write!(f, "CSV file not found: {path}"),
            Self::MissingHeader(path) => write!(f, "Could not read CSV headers from {path}"),
            Self::UnknownMapping { name, available } => write!(
                f,
                "Unknown mapping type: {name}. Available: {}",
                available.join(", ")
            ),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::InvalidRecordId(id) => write!(f, "Invalid record identifier: {id:?}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Upstream(msg) => write!(f, "Upstream result error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LotteryApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl LotteryApiError {
    /// Whether this error must abort a whole generation run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::MissingHeader(_) | Self::UnknownMapping { .. }
        )
    }
}

impl From<std::io::Error> for LotteryApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LotteryApiError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => Self::Io(io),
                other => Self::Csv(format!("{other:?}")),
            }
        } else {
            Self::Csv(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LotteryApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<anyhow::Error> for LotteryApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for lottery API operations.
pub type Result<T> = std::result::Result<T, LotteryApiError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LotteryApiError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(e.into(), msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Fatal variants keep their identity so callers can still match on them.
fn wrap(err: LotteryApiError, msg: String) -> LotteryApiError {
    if err.is_fatal() {
        err
    } else {
        LotteryApiError::Other(format!("{msg}: {err}"))
    }
}
