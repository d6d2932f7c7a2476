//! Error types for pbo_core crate.

use pbo_coeff::CoeffError;
use thiserror::Error;

/// Errors raised by polynomial construction, conversion and solving.
///
/// Every structural check runs before the receiver is touched, so an `Err`
/// never leaves a half-updated polynomial or model behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PbError {
    /// A term key is not a sequence of labels
    #[error("invalid term key: {0}")]
    InvalidKey(String),

    /// A degree-2 form met a higher-degree term
    #[error("term {term} has degree {degree}, exceeding the limit of {limit}")]
    DegreeExceeded {
        term: String,
        degree: usize,
        limit: usize,
    },

    /// Shape or value mismatch in an auxiliary conversion
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Coefficient(#[from] CoeffError),
}

pub type Result<T> = std::result::Result<T, PbError>;

