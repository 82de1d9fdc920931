//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

/// Fable used as the regression fixture; hashes at block size 24.
pub const FOX_AND_CROW: &str = "text/fox-and-crow.txt";

/// Signature of [`FOX_AND_CROW`].
pub const FOX_AND_CROW_SIG: &str = "24:3pV86J47f1YTZjQDngkLX4NVgBHjUXIQXxKwVR6BoOXqvUOPUBLZb0yep+tdyJ7UEQ:3rxJ47dYCDgMXAVgBDQYw34FxVnTKUX";

/// Get the full path to a sample file
pub fn sample_file_path<P: AsRef<Path>>(relative_path: P) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(relative_path)
}

/// Read a sample file, panicking with the path on failure.
pub fn read_sample<P: AsRef<Path>>(relative_path: P) -> Vec<u8> {
    let path = sample_file_path(relative_path);
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}
