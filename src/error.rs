//! Error handling for log normalization.
//!
//! Errors fall into two tiers. Line-level errors (bad timestamp, wrong
//! token count, malformed JSON record) are caught by the strategy that
//! produced them and the offending line is dropped. File-level errors
//! (unknown mode, unreadable input, explosion mismatch) abort the run for
//! that file and no output is written.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unknown parse mode: {mode}")]
    UnknownMode { mode: String },

    #[error("Timestamp format error: '{text}' does not match {format}")]
    TimestampFormat { text: String, format: &'static str },

    #[error("Schema mismatch: expected {expected} fields, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Record fields do not match table columns: {reason}")]
    InvalidRecord { reason: String },

    #[error(
        "Explosion mismatch at row {row}: column '{column}' has {found} values for {expected} cells"
    )]
    ExplosionMismatch {
        row: usize,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value '{value}': {reason}")]
    InvalidValue { value: String, reason: String },

    #[error("Invalid input format in {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, FieldLogError>;

/// Closed classification of failures for programmatic callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timestamp,
    SchemaMismatch,
    ExplosionMismatch,
    UnknownMode,
    Io,
    InvalidInput,
    Configuration,
}

impl FieldLogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldLogError::Io(_)
            | FieldLogError::FileNotFound { .. }
            | FieldLogError::ProcessingFailed { .. } => ErrorKind::Io,
            FieldLogError::UnknownMode { .. } => ErrorKind::UnknownMode,
            FieldLogError::TimestampFormat { .. } => ErrorKind::Timestamp,
            FieldLogError::SchemaMismatch { .. } | FieldLogError::InvalidRecord { .. } => {
                ErrorKind::SchemaMismatch
            }
            FieldLogError::ExplosionMismatch { .. } => ErrorKind::ExplosionMismatch,
            FieldLogError::Polars(_)
            | FieldLogError::InvalidValue { .. }
            | FieldLogError::InvalidFormat { .. } => ErrorKind::InvalidInput,
            FieldLogError::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Whether a strategy may drop the offending line and keep going
    pub fn is_line_recoverable(&self) -> bool {
        matches!(
            self,
            FieldLogError::TimestampFormat { .. }
                | FieldLogError::SchemaMismatch { .. }
                | FieldLogError::InvalidRecord { .. }
                | FieldLogError::InvalidValue { .. }
        )
    }

    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
