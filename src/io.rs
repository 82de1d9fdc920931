//! Bounded file reading for hashing files from disk.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Resource limits for reading input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IOLimits {
    /// Bytes read from a file before input is cut off.
    pub max_read_bytes: u64,
    /// Files larger than this are refused outright.
    pub max_file_size: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_read_bytes: 10 * 1024 * 1024, // 10MB
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// A reader that reports EOF once `limit` bytes have been consumed.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// True once the limit has been hit.
    pub fn is_exhausted(&self) -> bool {
        self.bytes_read >= self.limit
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.is_exhausted() {
            return Ok(0);
        }

        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Read a file into memory, honoring `limits`.
///
/// Files above `max_file_size` fail with `InvalidData`; larger reads are
/// truncated to `max_read_bytes` with a warning.
pub fn read_file_with_limits<P: AsRef<Path>>(path: P, limits: &IOLimits) -> io::Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    debug!(
        path = %path.display(),
        size,
        max_file_size = limits.max_file_size,
        max_read_bytes = limits.max_read_bytes,
        "opening input"
    );

    if size > limits.max_file_size {
        warn!("File too large: {} bytes (limit: {})", size, limits.max_file_size);
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "File too large: {} bytes (limit: {})",
                size, limits.max_file_size
            ),
        ));
    }

    let mut reader = BoundedReader::new(file, limits.max_read_bytes);
    let mut data = Vec::with_capacity(std::cmp::min(size, limits.max_read_bytes) as usize);
    reader.read_to_end(&mut data)?;
    if reader.is_exhausted() && size > limits.max_read_bytes {
        warn!(
            path = %path.display(),
            "input truncated to {} of {} bytes", data.len(), size
        );
    }
    Ok(data)
}
