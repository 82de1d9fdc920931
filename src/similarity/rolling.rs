//! Rolling-window checksum that decides where the input is cut into chunks.

use serde::{Deserialize, Serialize};

use super::ROLLING_WINDOW;

/// Adler-style checksum over the last [`ROLLING_WINDOW`] bytes.
///
/// `x` is the plain sum of the window, `y` a position-weighted sum and `z` a
/// shift/xor accumulator. All arithmetic wraps at 32 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollingHash {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub c: u32,
    pub size: u32,
    pub window: [u32; ROLLING_WINDOW as usize],
}

impl Default for RollingHash {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingHash {
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            c: 0,
            size: ROLLING_WINDOW,
            window: [0; ROLLING_WINDOW as usize],
        }
    }

    /// Push one byte through the window and return the new checksum.
    pub fn update(&mut self, byte: u8) -> u32 {
        let d = u32::from(byte);
        let slot = (self.c % ROLLING_WINDOW) as usize;

        self.y = self.y.wrapping_sub(self.x);
        self.y = self.y.wrapping_add(ROLLING_WINDOW.wrapping_mul(d));
        self.x = self.x.wrapping_add(d);
        self.x = self.x.wrapping_sub(self.window[slot]);
        self.window[slot] = d;
        self.c = self.c.wrapping_add(1);
        self.z = (self.z << 5) ^ d;

        self.sum()
    }

    pub fn sum(&self) -> u32 {
        self.x.wrapping_add(self.y).wrapping_add(self.z)
    }

    /// Whether the fields are consistent with a window of [`ROLLING_WINDOW`]
    /// bytes; only restored state can violate this.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.size == ROLLING_WINDOW && self.window.iter().all(|&b| b <= u32::from(u8::MAX))
    }
}
