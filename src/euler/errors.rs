/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for euler angle conversion

use crate::rotation::RotationError;
use thiserror::Error;

/// Errors that can occur while converting euler angles between conventions
#[derive(Error, Debug)]
pub enum EulerError {
    /// Error while building a rotation matrix
    #[error("Rotation error: {0}")]
    Rotation(#[from] RotationError),

    /// Requested convention name is not registered
    #[error("Unknown convention: '{0}'")]
    UnknownConvention(String),

    /// Composition or reference frame could not be determined
    #[error("Underspecified convention: {0}")]
    UnderspecifiedConvention(String),

    /// Decomposition requested for an axis order other than ZXZ or ZYZ
    #[error("Decomposition into {0} euler angles is not supported (supported: ZXZ, ZYZ)")]
    UnsupportedAxisOrderForDecomposition(String),

    /// Malformed convention definition (unknown value, bad JSON)
    #[error("Invalid convention definition: {0}")]
    InvalidConvention(String),

    /// A single row of a batch failed; the whole batch is rejected
    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<EulerError>,
    },
}

impl EulerError {
    /// Wrap an error with the index of the batch row it came from
    pub fn at_row(row: usize, err: impl Into<EulerError>) -> Self {
        EulerError::Row {
            row,
            source: Box::new(err.into()),
        }
    }
}

/// Result type for euler angle operations
pub type Result<T> = std::result::Result<T, EulerError>;
