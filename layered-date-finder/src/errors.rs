//! Error types for date-string resolution.

use thiserror::Error;

use crate::LocaleError;

/// Why a date string could not be resolved.
///
/// Only [`ParseError::Locale`] is fatal. Every other variant means "this
/// string is not a date" and callers are expected to move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// Nothing date-like was left after tokenizing.
    #[error("empty date string")]
    Empty,

    /// A word or symbol the date grammar does not know.
    #[error("unrecognized token {token:?} in {input:?}")]
    Unrecognized { token: String, input: String },

    /// The same field was given twice, or too many bare numbers were present.
    #[error("conflicting {field} in {input:?}")]
    Conflict { field: &'static str, input: String },

    /// The fields were recognized but do not form a valid calendar date or time.
    #[error("out of range date or time in {input:?}")]
    OutOfRange { input: String },
}

impl ParseError {
    /// Whether the error must abort the whole extraction run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Locale(_))
    }
}
