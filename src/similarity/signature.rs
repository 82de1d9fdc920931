//! Rendered CTPH signatures: `<blocksize>:<sig1>:<sig2>`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::{FuzzError, Result, Side};

// ASCII digits only; `\d` would also accept other Unicode digits.
static RE_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+):([0-9a-zA-Z+/]+):([0-9a-zA-Z+/]+)$").expect("valid signature regex")
});

/// A finalized fuzzy hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    block_size: u64,
    sig1: String,
    sig2: String,
}

impl Signature {
    pub(crate) fn new(block_size: u64, sig1: String, sig2: String) -> Self {
        Self {
            block_size,
            sig1,
            sig2,
        }
    }

    /// Parse `text`, attributing a failure to `side` of a comparison.
    pub fn parse_as(text: &str, side: Side) -> Result<Self> {
        let malformed = || FuzzError::MalformedSignature {
            side,
            input: text.to_string(),
        };

        let caps = RE_SIGNATURE.captures(text).ok_or_else(malformed)?;
        let block_size = caps[1].parse::<u64>().map_err(|_| malformed())?;
        Ok(Self::new(
            block_size,
            caps[2].to_string(),
            caps[3].to_string(),
        ))
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Part computed at the block size.
    pub fn sig1(&self) -> &str {
        &self.sig1
    }

    /// Part computed at twice the block size.
    pub fn sig2(&self) -> &str {
        &self.sig2
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.block_size, self.sig1, self.sig2)
    }
}

impl FromStr for Signature {
    type Err = FuzzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_as(s, Side::First)
    }
}
