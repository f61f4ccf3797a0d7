//! Error types for vaulttool.
//!
//! Configuration and pre-flight problems abort a run before any file is
//! touched. Per-file problems (cipher failures, unreadable files, malformed
//! vaults) are surfaced through these types too, but the engine catches them
//! and records them in its reports instead of returning early.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration loading, validation and pre-flight errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found (searched: {})", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read configuration: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("missing required configuration key: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("key file '{}' does not exist", .0.display())]
    KeyFileMissing(PathBuf),

    #[error("cipher binary '{0}' not found on PATH")]
    CipherBinaryMissing(String),
}

/// Failures of the encryption primitive.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Problems with the contents of a vault file.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("malformed vault file: {}", .0.display())]
    Malformed(PathBuf),

    #[error("invalid ciphertext encoding in {}: {reason}", .path.display())]
    InvalidEncoding { path: PathBuf, reason: String },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
