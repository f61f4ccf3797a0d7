//! OpenSSL backend.
//!
//! Runs `openssl enc` with salted PBKDF2 key derivation. The key file is
//! passed as `-pass file:<path>`, so its first line is the passphrase.
//!
//! ## Requirements
//!
//! - `openssl` (or the configured executable) must be installed
//! - The key file must be readable by the current user

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::trace;

use super::Cipher;
use crate::error::{CipherError, Result};

/// `openssl enc` invoked as an external process.
#[derive(Debug, Clone)]
pub struct OpenSsl {
    binary: String,
    algorithm: String,
    key_file: PathBuf,
}

impl OpenSsl {
    pub fn new(binary: &str, algorithm: &str, key_file: &Path) -> Self {
        Self {
            binary: binary.to_string(),
            algorithm: algorithm.to_string(),
            key_file: key_file.to_path_buf(),
        }
    }

    /// Check whether the executable resolves on PATH.
    pub fn available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    fn pass_arg(&self) -> String {
        format!("file:{}", self.key_file.display())
    }

    fn run(&self, args: &[&str]) -> std::result::Result<(), String> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            ));
        }
        Ok(())
    }
}

impl Cipher for OpenSsl {
    fn name(&self) -> &'static str {
        "openssl"
    }

    fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()> {
        trace!(algorithm = %self.algorithm, input = %plain.display(), "encrypting with openssl");

        let algorithm = format!("-{}", self.algorithm);
        let input = plain.to_string_lossy();
        let output = out.to_string_lossy();
        let pass = self.pass_arg();
        self.run(&[
            "enc", &algorithm, "-salt", "-pbkdf2", "-in", &input, "-out", &output, "-pass", &pass,
        ])
        .map_err(|e| CipherError::EncryptionFailed(e).into())
    }

    fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()> {
        trace!(algorithm = %self.algorithm, input = %input.display(), "decrypting with openssl");

        let algorithm = format!("-{}", self.algorithm);
        let input = input.to_string_lossy();
        let output = out.to_string_lossy();
        let pass = self.pass_arg();
        self.run(&[
            "enc", "-d", &algorithm, "-pbkdf2", "-in", &input, "-out", &output, "-pass", &pass,
        ])
        .map_err(|e| CipherError::DecryptionFailed(e).into())
    }
}
