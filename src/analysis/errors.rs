/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for particle table analysis

use crate::io::IoError;
use thiserror::Error;

/// Errors that can occur during table analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing data block: {0}")]
    MissingBlock(String),

    #[error("FSC curve does not cross {0} before its last shell")]
    CutoffNotCrossed(f64),

    #[error("Table error: {0}")]
    Table(#[from] IoError),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
