//! Error types for fuzzstep.
//!
//! All failures are local and recoverable: the caller decides whether to
//! surface them (for example as a rejected request) or to abandon a session.

use std::fmt;
use thiserror::Error;

/// Which argument of a two-signature comparison failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "string 1"),
            Side::Second => write!(f, "string 2"),
        }
    }
}

/// Main error type for fuzzstep operations.
#[derive(Debug, Error)]
pub enum FuzzError {
    /// A hashing session was started with a length below 1
    #[error("Invalid input length: {0}")]
    InvalidInputLength(i64),

    /// Serialized engine state had unknown, missing or mistyped fields
    #[error("Malformed state: {0}")]
    MalformedState(String),

    /// A signature did not match `<blocksize>:<sig1>:<sig2>`
    #[error("Invalid pattern in {side}: {input:?}")]
    MalformedSignature { side: Side, input: String },

    /// Signatures computed at different granularity
    #[error("Blocksize mismatch: {first} != {second}")]
    BlockSizeMismatch { first: u64, second: u64 },

    /// A signature was requested before the engine finished
    #[error("Hash is not finalized yet")]
    Incomplete,

    /// No algorithm registered under the given name
    #[error("Algorithm not registered: {0}")]
    UnknownAlgorithm(String),

    /// An algorithm name was registered twice
    #[error("Algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FuzzError {
    fn from(err: serde_json::Error) -> Self {
        FuzzError::MalformedState(err.to_string())
    }
}

/// Result type alias for fuzzstep operations
pub type Result<T> = std::result::Result<T, FuzzError>;

/// Convert fuzzstep errors to PyO3 exceptions
#[cfg(feature = "python-ext")]
impl From<FuzzError> for pyo3::PyErr {
    fn from(err: FuzzError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyException, PyIOError, PyKeyError, PyValueError};

        match err {
            FuzzError::Io(e) => PyIOError::new_err(e.to_string()),
            FuzzError::UnknownAlgorithm(name) => PyKeyError::new_err(name),
            FuzzError::InvalidInputLength(_)
            | FuzzError::MalformedState(_)
            | FuzzError::MalformedSignature { .. }
            | FuzzError::BlockSizeMismatch { .. } => PyValueError::new_err(err.to_string()),
            _ => PyException::new_err(err.to_string()),
        }
    }
}
