//! Encrypt: bring every vault up to date with its source file.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{write_atomic, Engine};
use crate::core::checksum::checksum;
use crate::core::cipher::Cipher;
use crate::core::codec;
use crate::core::domain::{EncryptAction, EncryptReport, FileError};
use crate::error::Result;

impl<C: Cipher> Engine<C> {
    /// Encrypt every discovered source file whose vault is missing or stale.
    ///
    /// Each source is registered in the ignore list first. A vault is
    /// rewritten when it does not exist, when its stored checksum differs from
    /// the source's current checksum, or when `force` is set. A failure on one
    /// file is recorded and the run moves on to the next.
    pub fn encrypt(&self, force: bool) -> EncryptReport {
        let suffix = self.config.options.suffix.as_str();
        let mut report = EncryptReport::default();

        debug!(force, cipher = self.cipher.name(), "encrypt started");
        self.ensure_ignored(&self.config.options.key_file);

        for source in self.source_files() {
            self.ensure_ignored(&source);

            let vault = codec::vault_path(&source, suffix);
            match self.encrypt_one(&source, &vault, force) {
                Ok(action) => {
                    if action != EncryptAction::Skipped {
                        info!(source = %source.display(), vault = %vault.display(), ?action, "vault written");
                    }
                    report.record(&source, &vault, action);
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "encryption failed");
                    report.fail(FileError::new(&source, e));
                }
            }
        }

        info!(
            total = report.total,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "encrypt finished"
        );
        report
    }

    fn encrypt_one(&self, source: &Path, vault: &Path, force: bool) -> Result<EncryptAction> {
        let current = checksum(source)?;
        let existed = vault.exists();

        if existed && !force {
            let stored = codec::read_checksum(vault)?;
            if stored.as_deref() == Some(current.as_str()) {
                debug!(source = %source.display(), "vault up to date");
                return Ok(EncryptAction::Skipped);
            }
            debug!(source = %source.display(), stored = ?stored, current = %current, "checksum changed");
        }

        let ciphertext = {
            let out = self.scratch()?;
            self.cipher.encrypt_file(source, out.path())?;
            fs::read(out.path())?
        };

        write_atomic(vault, codec::encode(&current, &ciphertext).as_bytes())?;

        Ok(if existed {
            EncryptAction::Updated
        } else {
            EncryptAction::Created
        })
    }

    /// Failures here are logged, not fatal: the vault is still worth writing.
    fn ensure_ignored(&self, path: &Path) {
        if let Err(e) = self.ignore.ensure(path) {
            warn!(path = %path.display(), error = %e, "could not update ignore list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{PoisonCipher, XorCipher};
    use super::*;
    use crate::core::checksum::checksum_bytes;
    use crate::core::config::{Config, Options};
    use crate::core::ignore::IgnoreList;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn engine<C: Cipher>(tmp: &TempDir, cipher: C) -> Engine<C> {
        let config = Config::new(
            vec![tmp.path().to_path_buf()],
            vec!["*.env".to_string()],
            Options::new(tmp.path().join("vault.key")),
        );
        Engine::with_cipher(config, cipher, IgnoreList::new(tmp.path()))
    }

    #[test]
    fn test_encrypt_creates_two_line_vault() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        let engine = engine(&tmp, XorCipher::default());

        let report = engine.encrypt(false);
        assert_eq!(report.total, 1);
        assert_eq!(report.created, 1);

        let contents = fs::read_to_string(tmp.path().join("a.env.vault")).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], checksum_bytes(b"X=1"));
        assert_eq!(report.changes[0].action, EncryptAction::Created);
    }

    #[test]
    fn test_encrypt_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        fs::write(tmp.path().join("b.env"), "Y=2").unwrap();
        let engine = engine(&tmp, XorCipher::default());

        engine.encrypt(false);
        let before = fs::read_to_string(tmp.path().join("a.env.vault")).unwrap();
        let second = engine.encrypt(false);

        assert_eq!(second.total, 2);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.written(), 0);
        assert_eq!(engine.cipher().encrypts.get(), 2);
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.env.vault")).unwrap(),
            before
        );
    }

    #[test]
    fn test_changed_source_is_updated() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.env");
        fs::write(&source, "X=1").unwrap();
        let engine = engine(&tmp, XorCipher::default());
        engine.encrypt(false);

        fs::write(&source, "X=2").unwrap();
        let report = engine.encrypt(false);

        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);
        assert_eq!(
            codec::read_checksum(&tmp.path().join("a.env.vault"))
                .unwrap()
                .unwrap(),
            checksum_bytes(b"X=2")
        );
    }

    #[test]
    fn test_force_reencrypts_everything() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        fs::write(tmp.path().join("b.env"), "Y=2").unwrap();
        let engine = engine(&tmp, XorCipher::default());
        engine.encrypt(false);

        let report = engine.encrypt(true);
        assert_eq!(report.updated, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(engine.cipher().encrypts.get(), 4);
    }

    #[test]
    fn test_vault_without_checksum_is_rewritten() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        fs::write(tmp.path().join("a.env.vault"), "").unwrap();
        let engine = engine(&tmp, XorCipher::default());

        let report = engine.encrypt(false);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn test_cipher_failure_does_not_abort_batch() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.env"), "A=1").unwrap();
        fs::write(tmp.path().join("poison.env"), "B=2").unwrap();
        fs::write(tmp.path().join("other.env"), "C=3").unwrap();
        let engine = engine(&tmp, PoisonCipher::new("poison"));

        let report = engine.encrypt(false);
        assert_eq!(report.total, 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].path, tmp.path().join("poison.env"));
        assert!(report.errors[0].message.contains("bad key"));
        assert!(!tmp.path().join("poison.env.vault").exists());
    }

    #[test]
    fn test_encrypt_registers_sources_in_ignore_list() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("config")).unwrap();
        fs::write(tmp.path().join("config/db.env"), "A=1").unwrap();
        fs::write(tmp.path().join("vault.key"), "k").unwrap();
        let engine = engine(&tmp, XorCipher::default());

        engine.encrypt(false);
        engine.encrypt(false);

        let entries: Vec<String> = fs::read_to_string(tmp.path().join(".gitignore"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(entries, vec!["vault.key", "config/db.env"]);
    }

    #[test]
    fn test_binary_checksum_line_is_rewritten() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.env");
        fs::write(&source, "X=1").unwrap();
        fs::write(tmp.path().join("a.env.vault"), b"\xff\xfe\nQUJD\n").unwrap();
        let engine = engine(&tmp, XorCipher::default());

        let report = engine.encrypt(false);
        assert_eq!(report.failed, 0);
        assert_eq!(report.updated, 1);
        let vault = fs::read_to_string(tmp.path().join("a.env.vault")).unwrap();
        assert_eq!(vault.lines().next(), Some(checksum_bytes(b"X=1").as_str()));
    }

    #[test]
    fn test_no_scratch_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        fs::write(tmp.path().join("poison.env"), "X=2").unwrap();
        let engine = engine(&tmp, PoisonCipher::new("poison")).scratch_dir(scratch.path());

        let report = engine.encrypt(false);
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 1);

        let is_scratch = |p: &PathBuf| p.to_string_lossy().contains(super::super::SCRATCH_PREFIX);
        for dir in [scratch.path(), tmp.path()] {
            let leftovers: Vec<PathBuf> = fs::read_dir(dir)
                .unwrap()
                .map(|e| e.unwrap().path())
                .filter(is_scratch)
                .collect();
            assert!(leftovers.is_empty(), "leftover scratch files: {:?}", leftovers);
        }
    }

    #[test]
    fn test_scratch_files_go_to_scratch_dir() {
        struct Peek(std::cell::RefCell<Vec<PathBuf>>);
        impl Cipher for Peek {
            fn encrypt_file(&self, plain: &Path, out: &Path) -> Result<()> {
                self.0.borrow_mut().push(out.to_path_buf());
                fs::copy(plain, out)?;
                Ok(())
            }
            fn decrypt_file(&self, input: &Path, out: &Path) -> Result<()> {
                fs::copy(input, out)?;
                Ok(())
            }
            fn name(&self) -> &'static str {
                "peek"
            }
        }

        let tmp = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.env"), "X=1").unwrap();
        let engine = engine(&tmp, Peek(Default::default())).scratch_dir(scratch.path());
        engine.encrypt(false);

        let seen = engine.cipher().0.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with(scratch.path()));
        assert!(!seen[0].exists());
    }
}
