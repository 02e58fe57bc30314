//! Error types for the data-loader crate.
//!
//! Any of these is fatal at startup: no query can be served without both
//! artifacts.

use thiserror::Error;

/// Errors that can occur while loading the catalog and the similarity table
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Binary similarity artifact could not be decoded
    #[error("Failed to decode binary artifact: {0}")]
    Bincode(#[from] bincode::Error),

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

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Header row lacks a required column
    #[error("Missing column '{column}' in header of {file}")]
    MissingColumn { file: String, column: String },

    /// The same id was declared twice where ids must be unique
    #[error("Duplicate {entity} with id {id}")]
    DuplicateId { entity: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
