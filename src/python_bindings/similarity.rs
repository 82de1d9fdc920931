//! Python bindings for CTPH hashing, comparison and state stepping.

use pyo3::prelude::*;

use crate::io::IOLimits;
use crate::registry::AlgorithmRegistry;

/// Register similarity-related Python bindings.
pub fn register_similarity_bindings(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let similarity_mod = pyo3::types::PyModule::new(py, "similarity")?;

    similarity_mod.add_function(wrap_pyfunction!(hash_bytes_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(hash_path_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(compare_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(pairwise_matrix_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(top_k_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(init_state_py, &similarity_mod)?)?;
    similarity_mod.add_function(wrap_pyfunction!(step_state_py, &similarity_mod)?)?;

    m.add_submodule(&similarity_mod)?;
    Ok(())
}

/// Fuzzy hash of a bytes object, rendered as `B:S1:S2`.
#[pyfunction]
#[pyo3(name = "hash_bytes")]
fn hash_bytes_py(data: &[u8]) -> PyResult<String> {
    Ok(crate::similarity::hash_bytes(data)?.to_string())
}

/// Fuzzy hash of a file.
#[pyfunction]
#[pyo3(name = "hash_path")]
#[pyo3(signature = (path, max_read_bytes=10_485_760, max_file_size=104_857_600))]
fn hash_path_py(path: String, max_read_bytes: u64, max_file_size: u64) -> PyResult<String> {
    let limits = IOLimits {
        max_read_bytes,
        max_file_size,
    };
    Ok(crate::similarity::hash_path(&path, &limits)?.to_string())
}

/// Edit distance between two signatures; raises on malformed or
/// incomparable input.
#[pyfunction]
#[pyo3(name = "compare")]
fn compare_py(a: &str, b: &str) -> PyResult<usize> {
    Ok(crate::similarity::compare(a, b)?)
}

/// Distances for every pair `(i, j)`, `i < j`; `None` where incomparable.
#[pyfunction]
#[pyo3(name = "pairwise_matrix")]
#[pyo3(signature = (digests, max_pairs=250_000))]
fn pairwise_matrix_py(digests: Vec<String>, max_pairs: usize) -> Vec<(usize, usize, Option<usize>)> {
    crate::similarity::pairwise_matrix(&digests, max_pairs)
}

/// The `k` candidates nearest to `query_digest`, as `(digest, distance)`.
#[pyfunction]
#[pyo3(name = "top_k")]
#[pyo3(signature = (query_digest, candidates, k=5, max_distance=5))]
fn top_k_py(
    query_digest: &str,
    candidates: Vec<String>,
    k: usize,
    max_distance: usize,
) -> PyResult<Vec<(String, usize)>> {
    let best = crate::similarity::top_k(
        query_digest,
        candidates.iter().map(String::as_str),
        k,
        max_distance,
    )?;
    Ok(best.into_iter().map(|(d, s)| (d.to_string(), s)).collect())
}

/// Serialized initial state for the named algorithm.
#[pyfunction]
#[pyo3(name = "init_state")]
#[pyo3(signature = (input_len, algo="ctph"))]
fn init_state_py(input_len: i64, algo: &str) -> PyResult<String> {
    let algo = AlgorithmRegistry::with_defaults().get(algo)?;
    Ok(algo.init_state(input_len)?)
}

/// Advance serialized state by one byte.
#[pyfunction]
#[pyo3(name = "step_state")]
#[pyo3(signature = (state, byte, algo="ctph"))]
fn step_state_py(state: &str, byte: u8, algo: &str) -> PyResult<String> {
    let algo = AlgorithmRegistry::with_defaults().get(algo)?;
    Ok(algo.step_state(state, byte)?)
}
