//! Native age backend.
//!
//! The key file holds a single x25519 identity. Data is encrypted to the
//! identity's own public key, so the one key file both locks and unlocks
//! every vault.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use tracing::trace;
use zeroize::Zeroizing;

use super::Cipher;
use crate::error::{CipherError, Result};

/// age cipher bound to one identity.
pub struct Age {
    identity: x25519::Identity,
    recipient: x25519::Recipient,
}

impl std::fmt::Debug for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Age")
            .field("recipient", &self.recipient.to_string())
            .finish()
    }
}

impl Age {
    /// Load the identity stored in `path`.
    ///
    /// Blank lines and `#` comments are skipped; the first remaining line
    /// must be an `AGE-SECRET-KEY-` string.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKey` if the file is unreadable or holds no
    /// valid identity.
    pub fn from_key_file(path: &Path) -> Result<Self> {
        let contents = Zeroizing::new(fs::read_to_string(path).map_err(|e| {
            CipherError::InvalidKey(format!("cannot read {}: {}", path.display(), e))
        })?);

        let line = contents
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .ok_or_else(|| CipherError::InvalidKey(format!("{} is empty", path.display())))?;

        let identity = line.parse::<x25519::Identity>().map_err(|e| {
            CipherError::InvalidKey(format!("{}: {}", path.display(), e))
        })?;
        let recipient = identity.to_public();

        Ok(Self {
            identity,
            recipient,
        })
    }
}

impl Cipher for Age {
    fn name(&self) -> &'static str {
        "age"
    }

    fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()> {
        let plaintext = Zeroizing::new(fs::read(plain).map_err(|e| {
            CipherError::EncryptionFailed(format!("cannot read {}: {}", plain.display(), e))
        })?);
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let encryptor = ::age::Encryptor::with_recipients(std::iter::once(
            &self.recipient as &dyn ::age::Recipient,
        ))
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(&mut encrypted)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        writer
            .write_all(&plaintext)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");
        fs::write(out, &encrypted).map_err(|e| {
            CipherError::EncryptionFailed(format!("cannot write {}: {}", out.display(), e))
        })?;
        Ok(())
    }

    fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()> {
        let encrypted = fs::read(input).map_err(|e| {
            CipherError::DecryptionFailed(format!("cannot read {}: {}", input.display(), e))
        })?;
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let decryptor = ::age::Decryptor::new(&encrypted[..])
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;
        let mut reader = decryptor
            .decrypt(std::iter::once(&self.identity as &dyn ::age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        let mut decrypted = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");
        fs::write(out, &*decrypted).map_err(|e| {
            CipherError::DecryptionFailed(format!("cannot write {}: {}", out.display(), e))
        })?;
        Ok(())
    }
}

/// Generate a new identity and write it to `path` (mode 0600 on Unix).
///
/// Returns the public key.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be written.
pub fn generate_identity(path: &Path) -> Result<String> {
    let identity = x25519::Identity::generate();
    let public_key = identity.to_public().to_string();

    let secret = identity.to_string();
    let contents = Zeroizing::new(format!(
        "# public key: {}\n{}\n",
        public_key,
        secret.expose_secret()
    ));
    fs::write(path, contents.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(public_key)
}
