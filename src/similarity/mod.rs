//! Fuzzy hashing and similarity analysis (CTPH implementation).
//!
//! Context-triggered piecewise hashing in the ssdeep style: a rolling hash
//! over a 7-byte window decides where chunk boundaries fall, and a per-chunk
//! digest contributes one base64 character to the signature at every
//! boundary. Two signatures are produced at once, at block size `B` and
//! `2B`, so inputs of neighbouring sizes remain comparable. Small local edits
//! change only a few characters.
//!
//! The incremental API is [`CtphEngine`]; [`hash_bytes`] and [`hash_path`]
//! drive it over a whole buffer, and [`compare`] scores two results.

mod compare;
mod engine;
mod rolling;
mod signature;
mod state;
mod sum_hash;

pub use compare::{compare, is_similar, pairwise_matrix, top_k};
pub use engine::{calc_init_block_size, CtphEngine, StepOutcome};
pub use rolling::RollingHash;
pub use signature::Signature;
pub use sum_hash::SumHash;

use std::path::Path;

use crate::error::{FuzzError, Result};
use crate::io::{read_file_with_limits, IOLimits};

/// Smallest block size; retries stop here.
pub const BLOCK_SIZE_MIN: u64 = 3;

/// Target signature length. A pass whose first part is shorter than half
/// of this is retried at half the block size.
pub const SIGNATURE_LEN: u64 = 64;

/// Bytes covered by the rolling hash.
pub const ROLLING_WINDOW: u32 = 7;

/// Signature alphabet, indexed by the low six bits of a chunk digest.
pub const B64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Initial value of the per-chunk digest.
pub const SUM_HASH_INIT: u32 = 0x28021967;

/// Multiplier of the per-chunk digest.
pub const SUM_HASH_PRIME: u32 = 0x01000193;

/// Hash a complete buffer, replaying it as often as the engine retries.
pub fn hash_bytes(data: &[u8]) -> Result<Signature> {
    let len = i64::try_from(data.len()).map_err(|_| FuzzError::InvalidInputLength(i64::MAX))?;
    let mut engine = CtphEngine::new(len)?;

    while engine.is_retrying() {
        for &b in data {
            engine.step(b);
        }
        // one extra step closes the pass; its byte is not hashed
        engine.step(0);
    }

    engine.signature()
}

/// Hash a file from disk within the given I/O limits.
pub fn hash_path<P: AsRef<Path>>(path: P, limits: &IOLimits) -> Result<Signature> {
    let data = read_file_with_limits(path, limits)?;
    hash_bytes(&data)
}
