//! Configuration for fuzzstep front ends.
//!
//! The hashing algorithm itself has no knobs: block-size floor, signature
//! length and window size are fixed so signatures stay comparable. What is
//! configurable is how inputs are read and how comparisons are judged.

use crate::error::{FuzzError, Result};
use crate::io::IOLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzConfig {
    /// I/O limits for hashing files.
    pub io: IOLimits,
    /// Comparison thresholds.
    pub similarity: SimilarityConfig,
}

impl FuzzConfig {
    /// Parse a JSON configuration. Unknown keys are rejected.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| FuzzError::Config(e.to_string()))
    }

    /// Load a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Similarity (CTPH comparison) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityConfig {
    /// Largest edit distance still reported as "similar".
    pub max_distance: usize,
    /// Upper bound on comparisons performed by a pairwise matrix.
    pub max_pairs: usize,
    /// Number of results returned by top-k searches.
    pub top_k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            max_distance: 5,
            max_pairs: 250_000,
            top_k: 5,
        }
    }
}
