//! Incremental CTPH state machine.
//!
//! The engine consumes one byte per [`CtphEngine::step`] call. Once the
//! position counter passes the input length the pass is finalized: either the
//! signature is long enough (or the block size is already at its floor) and
//! the engine becomes terminal, or the block size is halved, everything else
//! is reset, and the caller replays the input from its first byte.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::rolling::RollingHash;
use super::signature::Signature;
use super::sum_hash::SumHash;
use super::{BLOCK_SIZE_MIN, SIGNATURE_LEN};
use crate::error::{FuzzError, Result};

/// What a single [`CtphEngine::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The byte was consumed; flags tell which signature grew.
    Scanned { trigger1: bool, trigger2: bool },
    /// The pass ended with a short signature. Block size was halved and the
    /// input must be replayed from the start.
    Retry { block_size: u64 },
    /// The signature is final.
    Done,
}

/// Smallest `BLOCK_SIZE_MIN * 2^k` whose signature target covers `input_len`.
///
/// Lengths too large for any such target get the last block size whose
/// target still fits in a `u64`.
pub fn calc_init_block_size(input_len: u64) -> u64 {
    let mut block_size = BLOCK_SIZE_MIN;
    while block_size.saturating_mul(SIGNATURE_LEN) < input_len {
        block_size <<= 1;
    }
    block_size
}

/// Context-triggered piecewise hash over a stream of known length.
///
/// The whole state is a plain value: it can be serialized between steps
/// (see [`CtphEngine::to_json`]) and restored without losing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CtphEngine {
    pub(crate) block_size: u64,
    pub(crate) hash1: SumHash,
    pub(crate) hash2: SumHash,
    pub(crate) index: i64,
    #[serde(rename = "input_length")]
    pub(crate) input_len: i64,
    pub(crate) is_trigger1: bool,
    pub(crate) is_trigger2: bool,
    pub(crate) retry: bool,
    pub(crate) rolling_hash: RollingHash,
    pub(crate) sig1: String,
    pub(crate) sig2: String,
}

impl CtphEngine {
    /// Start a hashing session for an input of `input_len` bytes.
    pub fn new(input_len: i64) -> Result<Self> {
        if input_len < 1 {
            return Err(FuzzError::InvalidInputLength(input_len));
        }

        let block_size = calc_init_block_size(input_len as u64);
        debug!(input_len, block_size, "ctph session started");

        Ok(Self {
            block_size,
            hash1: SumHash::new(),
            hash2: SumHash::new(),
            index: -1,
            input_len,
            is_trigger1: false,
            is_trigger2: false,
            retry: true,
            rolling_hash: RollingHash::new(),
            sig1: String::new(),
            sig2: String::new(),
        })
    }

    /// Feed the next byte.
    ///
    /// The call that moves the position past the end of the input finalizes
    /// the pass and ignores `byte`. Stepping a finished engine changes nothing.
    pub fn step(&mut self, byte: u8) -> StepOutcome {
        if !self.retry {
            warn!(block_size = self.block_size, "step on a finished ctph engine ignored");
            return StepOutcome::Done;
        }

        self.index += 1;
        if self.index >= self.input_len {
            return self.finish_pass();
        }

        let rs = self.rolling_hash.update(byte);
        self.hash1.update(byte);
        self.hash2.update(byte);
        self.is_trigger1 = false;
        self.is_trigger2 = false;

        let rs = u64::from(rs);
        if rs % self.block_size == self.block_size - 1 {
            self.sig1.push(self.hash1.b64_char());
            self.is_trigger1 = true;
            self.hash1.reset();
            trace!(index = self.index, len = self.sig1.len(), "sig1 trigger");
        }

        let double = 2 * self.block_size;
        if rs % double == double - 1 {
            self.sig2.push(self.hash2.b64_char());
            self.is_trigger2 = true;
            self.hash2.reset();
            trace!(index = self.index, len = self.sig2.len(), "sig2 trigger");
        }

        StepOutcome::Scanned {
            trigger1: self.is_trigger1,
            trigger2: self.is_trigger2,
        }
    }

    fn finish_pass(&mut self) -> StepOutcome {
        self.sig1.push(self.hash1.b64_char());
        self.sig2.push(self.hash2.b64_char());
        self.is_trigger1 = false;
        self.is_trigger2 = false;

        if self.sig1.len() as u64 >= SIGNATURE_LEN / 2 || self.block_size == BLOCK_SIZE_MIN {
            self.retry = false;
            debug!(
                block_size = self.block_size,
                sig1_len = self.sig1.len(),
                sig2_len = self.sig2.len(),
                "ctph signature finalized"
            );
            return StepOutcome::Done;
        }

        let short_len = self.sig1.len();
        self.reset();
        self.block_size /= 2;
        debug!(
            sig1_len = short_len,
            block_size = self.block_size,
            "signature too short, retrying at half block size"
        );
        StepOutcome::Retry {
            block_size: self.block_size,
        }
    }

    fn reset(&mut self) {
        self.hash1.reset();
        self.hash2.reset();
        self.index = -1;
        self.rolling_hash = RollingHash::new();
        self.sig1.clear();
        self.sig2.clear();
    }

    /// The final signature, or [`FuzzError::Incomplete`] while still hashing.
    pub fn signature(&self) -> Result<Signature> {
        if self.retry {
            return Err(FuzzError::Incomplete);
        }
        Ok(Signature::new(
            self.block_size,
            self.sig1.clone(),
            self.sig2.clone(),
        ))
    }

    /// `"<block_size>:<sig1>:<sig2>"` once finished.
    pub fn render(&self) -> Result<String> {
        self.signature().map(|s| s.to_string())
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn input_len(&self) -> i64 {
        self.input_len
    }

    pub fn sig1(&self) -> &str {
        &self.sig1
    }

    pub fn sig2(&self) -> &str {
        &self.sig2
    }

    /// True until the engine reaches its terminal state.
    pub fn is_retrying(&self) -> bool {
        self.retry
    }

    pub fn is_done(&self) -> bool {
        !self.retry
    }

    /// Trigger flags left by the most recent step.
    pub fn triggers(&self) -> (bool, bool) {
        (self.is_trigger1, self.is_trigger2)
    }

    pub fn rolling_hash(&self) -> &RollingHash {
        &self.rolling_hash
    }
}
