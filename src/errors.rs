//! Error types for date extraction.
//!
//! Only locale, model and configuration problems surface as errors. A
//! candidate that merely fails to parse is dropped and never reaches the
//! caller.

use thiserror::Error;

pub use layered_date_finder::LocaleError;

/// Errors that abort an extraction run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateError {
    /// The configured locale cannot be used for date parsing.
    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// The classifier artifact could not be loaded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The extraction configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors loading or validating a classifier artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The artifact is not valid RON for the expected schema.
    #[error("failed to parse model artifact: {message}")]
    Parse { message: String },

    /// The artifact file could not be read.
    #[error("failed to read model artifact: {path}: {message}")]
    Io { path: String, message: String },

    /// A weight refers to a column the feature layout does not produce.
    #[error("model weight for unknown feature column {column:?}")]
    UnknownColumn { column: String },

    /// The feature configuration cannot produce any column.
    #[error("invalid feature configuration: {message}")]
    InvalidFeatures { message: String },
}

/// Errors in an extraction configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("threshold must be within [0, 1], got {value}")]
    Threshold { value: f64 },
}

/// Result type for extraction operations.
pub type DateResult<T> = Result<T, DateError>;
