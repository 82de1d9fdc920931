//! fuzzstep: context-triggered piecewise hashing, one byte at a time.
//!
//! The engine in [`similarity`] keeps its whole state in a plain value that
//! serializes to JSON, so a caller can hash a stream across many separate
//! requests and persist the state anywhere in between.
//!
//! ```
//! use fuzzstep::similarity::{compare, hash_bytes};
//!
//! let a = hash_bytes(b"The quick brown fox jumps over the lazy dog")?;
//! let b = hash_bytes(b"The quick brown fox jumps over the lazy cat")?;
//! let distance = compare(&a.to_string(), &b.to_string())?;
//! assert!(distance <= 5);
//! # Ok::<(), fuzzstep::FuzzError>(())
//! ```

/// Front-end configuration
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
/// Named algorithms and serialized-state stepping
pub mod registry;
pub mod similarity;

#[cfg(feature = "python-ext")]
pub mod python_bindings;

pub use config::{FuzzConfig, SimilarityConfig};
pub use error::{FuzzError, Result, Side};
pub use registry::{Algorithm, AlgorithmRegistry};
pub use similarity::{
    compare, hash_bytes, hash_path, is_similar, pairwise_matrix, top_k, CtphEngine, Signature,
    StepOutcome,
};

/// A Python module implemented in Rust.
#[cfg(feature = "python-ext")]
#[pyo3::pymodule]
fn fuzzstep(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    python_bindings::register_python_bindings(m.py(), m)
}
