//! Per-chunk running digest.

use serde::{Deserialize, Serialize};

use super::{B64_ALPHABET, SUM_HASH_INIT, SUM_HASH_PRIME};

/// FNV-style 32-bit accumulator over the bytes of the current chunk.
///
/// Each trigger emits [`SumHash::b64_char`] and resets the digest, so every
/// signature character depends only on the bytes of its own chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SumHash(u32);

impl Default for SumHash {
    fn default() -> Self {
        Self::new()
    }
}

impl SumHash {
    pub const fn new() -> Self {
        Self(SUM_HASH_INIT)
    }

    pub fn update(&mut self, byte: u8) {
        self.0 = self.0.wrapping_mul(SUM_HASH_PRIME) ^ u32::from(byte);
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Low six bits of the digest mapped onto the signature alphabet.
    pub fn b64_char(&self) -> char {
        char::from(B64_ALPHABET[(self.0 & 0x3F) as usize])
    }

    pub fn reset(&mut self) {
        self.0 = SUM_HASH_INIT;
    }
}
