//! Error types for the data-loader crate.
//!
//! Every failure while reading the catalog or the rating store maps to one
//! variant of [`DataLoadError`]. Loading happens once at startup, so these
//! errors are fatal for the process that hits them.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Neither a CSV nor a DAT dataset was found at the given location
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a record
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two catalog entries claim the same movie id
    #[error("Duplicate movie id {id}: {first:?} and {second:?}")]
    DuplicateMovie {
        id: u32,
        first: String,
        second: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
