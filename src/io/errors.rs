/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for particle metadata file I/O

use crate::euler::EulerError;
use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing metadata files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Data row {row} of column {column}: '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Row {row} out of range for a table with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Tomogram index {0} not found in table map")]
    UnknownTomogram(i64),

    #[error("Euler angle error: {0}")]
    Euler(#[from] EulerError),
}

impl IoError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        IoError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for I/O operations
pub type Result<T> = std::result::Result<T, IoError>;
