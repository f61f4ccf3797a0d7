//! Encryption backends.
//!
//! The engine never encrypts anything itself. It hands a pair of paths to a
//! [`Cipher`] and works with whatever ciphertext appears at the output path.
//!
//! ## Backends
//!
//! - **OpenSSL** (default): shells out to `openssl enc` with a passphrase
//!   key file and a configurable algorithm.
//! - **age**: native x25519 encryption; the key file holds an age identity
//!   (`AGE-SECRET-KEY-...`) and data is encrypted to its public half.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait in a new file
//! 2. Add a variant to `CipherBackend` and a `Backend` config value

use std::path::Path;

use tracing::debug;

use crate::core::config::{Backend, Options};
use crate::error::Result;

mod age;
mod openssl;

pub use self::age::{generate_identity, Age};
pub use self::openssl::OpenSsl;

/// File-to-file encryption primitive.
///
/// Implementations read the whole input and write the whole output; a
/// failure may leave a partial file at the output path, which callers are
/// expected to place in a scratch location.
pub trait Cipher {
    /// Encrypt `plain` and write the ciphertext to `out`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the primitive is unavailable,
    /// the key cannot be used, or the input cannot be read.
    fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()>;

    /// Decrypt `input` and write the plaintext to `out`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if the primitive is unavailable,
    /// the key is wrong, or the ciphertext is corrupt.
    fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// Cipher selected by configuration.
#[derive(Debug)]
pub enum CipherBackend {
    OpenSsl(OpenSsl),
    Age(Age),
}

impl CipherBackend {
    /// Create the backend named by `options.backend`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKey` if the age key file cannot be parsed.
    pub fn from_options(options: &Options) -> Result<Self> {
        match options.backend {
            Backend::OpenSsl => {
                debug!(algorithm = %options.algorithm, "creating openssl cipher backend");
                Ok(Self::OpenSsl(OpenSsl::new(
                    &options.openssl_path,
                    &options.algorithm,
                    &options.key_file,
                )))
            }
            Backend::Age => {
                debug!("creating age cipher backend");
                Ok(Self::Age(Age::from_key_file(&options.key_file)?))
            }
        }
    }
}

impl Cipher for CipherBackend {
    fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()> {
        match self {
            Self::OpenSsl(c) => c.encrypt_file(plain, out),
            Self::Age(c) => c.encrypt_file(plain, out),
        }
    }

    fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()> {
        match self {
            Self::OpenSsl(c) => c.decrypt_file(input, out),
            Self::Age(c) => c.decrypt_file(input, out),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::OpenSsl(c) => c.name(),
            Self::Age(c) => c.name(),
        }
    }
}

impl<C: Cipher + ?Sized> Cipher for &C {
    fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()> {
        (**self).encrypt_file(plain, out)
    }

    fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()> {
        (**self).decrypt_file(input, out)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
