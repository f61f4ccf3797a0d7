//! Vault file format.
//!
//! A vault file is UTF-8 text with exactly two lines:
//!
//! ```text
//! <64 hex chars: SHA-256 of the plaintext at encryption time>
//! <base64 of the ciphertext>
//! ```
//!
//! The first line is a plaintext checksum used for change detection. It is
//! not a checksum of the ciphertext.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, VaultError};

/// Decoded contents of a well-formed vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultContents {
    /// Checksum of the plaintext the vault was produced from.
    pub checksum: String,
    /// Base64-encoded ciphertext, as stored.
    pub ciphertext: String,
}

impl VaultContents {
    /// Decode the base64 payload into raw ciphertext bytes.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidEncoding` when the payload is not valid base64.
    pub fn ciphertext_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        STANDARD.decode(self.ciphertext.as_bytes()).map_err(|e| {
            VaultError::InvalidEncoding {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Serialize a checksum and ciphertext into vault file contents.
pub fn encode(checksum: &str, ciphertext: &[u8]) -> String {
    format!("{}\n{}\n", checksum, STANDARD.encode(ciphertext))
}

/// Parse vault file contents.
///
/// Returns `None` when fewer than two non-empty lines are present. Callers
/// treat that as "skip this file", never as a fatal error.
pub fn decode(contents: &str) -> Option<VaultContents> {
    let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());
    let checksum = lines.next()?;
    let ciphertext = lines.next()?;

    Some(VaultContents {
        checksum: checksum.to_string(),
        ciphertext: ciphertext.to_string(),
    })
}

/// First line of vault file contents, if present and non-empty.
pub fn peek_checksum(contents: &str) -> Option<&str> {
    contents
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

/// Read only the checksum line of a vault file on disk.
///
/// A first line that is not UTF-8 reads as no checksum, so the vault counts
/// as stale rather than unreadable.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub fn read_checksum(path: &Path) -> Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut first = Vec::new();
    reader.read_until(b'\n', &mut first)?;
    Ok(std::str::from_utf8(&first)
        .ok()
        .and_then(peek_checksum)
        .map(str::to_string))
}

/// Vault path for a source file: the source path with `suffix` appended.
pub fn vault_path(source: &Path, suffix: &str) -> PathBuf {
    let mut raw = source.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Source path for a vault file: the vault path with `suffix` stripped.
///
/// Returns `None` when the path does not end with `suffix`.
pub fn source_path(vault: &Path, suffix: &str) -> Option<PathBuf> {
    let raw = vault.to_str()?;
    raw.strip_suffix(suffix)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
