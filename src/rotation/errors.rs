/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the rotation module

use thiserror::Error;

/// Errors that can occur while building rotation matrices
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotationError {
    /// Axis letter outside of X, Y and Z
    #[error("Invalid axis: '{0}' (expected one of X, Y, Z)")]
    InvalidAxis(char),

    /// Axis order string that is not exactly three axes long
    #[error("Invalid axis order: '{0}' (expected three axes, e.g. ZXZ)")]
    InvalidAxisOrder(String),

    /// Composition name other than intrinsic or extrinsic
    #[error("Invalid composition: '{0}' (expected intrinsic or extrinsic)")]
    InvalidComposition(String),

    /// Malformed angle triplet (wrong length or non-finite angle)
    #[error("Invalid euler triplet: {0}")]
    InvalidTriplet(String),
}

/// Result type for rotation operations
pub type Result<T> = std::result::Result<T, RotationError>;
