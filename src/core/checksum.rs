//! File checksums for change detection.
//!
//! A vault stores the SHA-256 of the plaintext it was produced from. Comparing
//! that value with a fresh digest of the source file is the only staleness
//! signal the engine uses.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::core::constants::CHECKSUM_CHUNK;
use crate::error::Result;

/// Compute the hex-encoded SHA-256 digest of a file.
///
/// The file is read in fixed-size chunks so arbitrarily large files hash in
/// constant memory.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read to completion.
pub fn checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHECKSUM_CHUNK];
    let mut total = 0usize;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n;
    }

    trace!(path = %path.display(), bytes = total, "checksummed");
    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA-256 digest of an in-memory buffer.
pub fn checksum_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
