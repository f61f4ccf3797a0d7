//! The synchronization engine.
//!
//! Decides, for every matching file, whether its vault copy is missing,
//! stale or current, and runs the one-way transformation that fixes it.
//! The engine keeps no state between runs: everything it knows comes from
//! rescanning the filesystem, so every operation is safe to repeat.
//!
//! `encrypt` and `refresh` need a [`Cipher`]; `remove`, `check_ignore`,
//! `status` and `missing_sources` only need the configuration and are also
//! available as free functions.

mod encrypt;
mod inspect;
mod refresh;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::cipher::{Cipher, CipherBackend};
use crate::core::config::Config;
use crate::core::discovery;
use crate::core::domain::{EncryptReport, FileState, IgnoreReport, RefreshReport, RemoveReport};
use crate::core::ignore::{IgnoreCheck, IgnoreList};
use crate::error::Result;

pub(super) const SCRATCH_PREFIX: &str = ".vaulttool-";

pub use inspect::{check_ignore, missing_sources, remove, status};

/// Keeps source files and vault files consistent.
pub struct Engine<C: Cipher = CipherBackend> {
    pub(super) config: Config,
    pub(super) cipher: C,
    pub(super) ignore: IgnoreList,
    /// Where ciphertext scratch files live; never inside a search root.
    pub(super) scratch_dir: PathBuf,
}

impl<C: Cipher> std::fmt::Debug for Engine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("cipher", &self.cipher.name())
            .field("ignore", &self.ignore)
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

impl Engine<CipherBackend> {
    /// Run pre-flight checks and build the configured cipher backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KeyFileMissing` or `ConfigError::CipherBinaryMissing`
    /// before any file is touched, or `CipherError::InvalidKey` if the age key
    /// file cannot be parsed.
    pub fn open(config: Config, ignore: IgnoreList) -> Result<Self> {
        config.preflight()?;
        let cipher = CipherBackend::from_options(&config.options)?;
        Ok(Self::with_cipher(config, cipher, ignore))
    }
}

impl<C: Cipher> Engine<C> {
    /// Build an engine around an explicit cipher. No pre-flight checks run.
    pub fn with_cipher(config: Config, cipher: C, ignore: IgnoreList) -> Self {
        Self {
            config,
            cipher,
            ignore,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Put scratch files in `dir` instead of the system temp directory.
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Encrypt, then restore missing sources (all sources when `force`).
    pub fn sync(&self, force: bool) -> (EncryptReport, RefreshReport) {
        let encrypted = self.encrypt(force);
        let refreshed = self.refresh(force);
        (encrypted, refreshed)
    }

    /// Delete every vault file. See [`remove`].
    pub fn remove(&self) -> RemoveReport {
        remove(&self.config)
    }

    /// Source files version control would not ignore. See [`check_ignore`].
    pub fn check_ignore(&self, checker: &dyn IgnoreCheck) -> IgnoreReport {
        check_ignore(&self.config, checker)
    }

    /// State of every known pair. See [`status`].
    pub fn status(&self) -> Result<Vec<(PathBuf, FileState)>> {
        status(&self.config)
    }

    /// Sources that have a vault but no plaintext. See [`missing_sources`].
    pub fn missing_sources(&self) -> Vec<PathBuf> {
        missing_sources(&self.config)
    }

    pub(super) fn source_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        discovery::source_files(&self.config)
    }

    pub(super) fn vault_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        discovery::vault_files(&self.config)
    }

    /// Scratch file for ciphertext, removed when dropped.
    pub(super) fn scratch(&self) -> Result<NamedTempFile> {
        Ok(tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(&self.scratch_dir)?)
    }
}

/// Directory a file lives in, `.` for bare file names.
pub(super) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Write `contents` next to `dest` and rename it into place.
pub(super) fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempfile_in(parent_dir(dest))?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
