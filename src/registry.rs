//! Named algorithms and text-state stepping.
//!
//! Front ends that persist state between single-byte requests look an
//! algorithm up by name and drive it through [`Algorithm::init_state`] and
//! [`Algorithm::step_state`], which take and return serialized state. The
//! registry is an ordinary value owned by the caller; nothing here is global.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{FuzzError, Result};
use crate::similarity::CtphEngine;

/// Every algorithm this crate can step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Ctph,
}

impl Algorithm {
    pub const ALL: [Algorithm; 1] = [Algorithm::Ctph];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Ctph => "ctph",
        }
    }

    /// Fresh serialized state for an input of `input_len` bytes.
    pub fn init_state(&self, input_len: i64) -> Result<String> {
        match self {
            Algorithm::Ctph => CtphEngine::new(input_len)?.to_json(),
        }
    }

    /// Decode `state`, consume `byte`, and encode the result.
    pub fn step_state(&self, state: &str, byte: u8) -> Result<String> {
        match self {
            Algorithm::Ctph => {
                let mut engine = CtphEngine::from_json(state)?;
                let outcome = engine.step(byte);
                debug!(algo = self.name(), index = engine.index(), ?outcome, "stepped");
                engine.to_json()
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name to algorithm lookup, safe to share between request handlers.
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    algos: RwLock<BTreeMap<String, Algorithm>>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in algorithm under its own name.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for algo in Algorithm::ALL {
            // names in ALL are distinct
            let _ = registry.register(algo.name(), algo);
        }
        registry
    }

    pub fn register(&self, name: &str, algo: Algorithm) -> Result<()> {
        let mut algos = self.algos.write().unwrap_or_else(|e| e.into_inner());
        if algos.contains_key(name) {
            return Err(FuzzError::DuplicateAlgorithm(name.to_string()));
        }
        algos.insert(name.to_string(), algo);
        info!(name, algo = %algo, "algorithm registered");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Algorithm> {
        let algos = self.algos.read().unwrap_or_else(|e| e.into_inner());
        algos
            .get(name)
            .copied()
            .ok_or_else(|| FuzzError::UnknownAlgorithm(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let algos = self.algos.read().unwrap_or_else(|e| e.into_inner());
        algos.keys().cloned().collect()
    }
}
