//! Refresh: restore plaintext files from their vaults.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{parent_dir, Engine, SCRATCH_PREFIX};
use crate::core::checksum::checksum;
use crate::core::cipher::Cipher;
use crate::core::codec;
use crate::core::domain::{FileError, RefreshReport};
use crate::error::{Error, Result, VaultError};

impl<C: Cipher> Engine<C> {
    /// Decrypt vault files back into their source paths.
    ///
    /// Without `force`, existing source files are left alone and only missing
    /// ones are restored. Malformed vaults are skipped and counted; cipher and
    /// filesystem failures are recorded per file and the run continues.
    pub fn refresh(&self, force: bool) -> RefreshReport {
        let suffix = self.config.options.suffix.as_str();
        let mut report = RefreshReport::default();

        debug!(force, cipher = self.cipher.name(), "refresh started");

        for vault in self.vault_files() {
            let Some(source) = codec::source_path(&vault, suffix) else {
                continue;
            };

            if source.exists() && !force {
                debug!(source = %source.display(), "source present, skipping");
                report.skip();
                continue;
            }

            match self.restore_one(&vault, &source) {
                Ok(()) => {
                    info!(vault = %vault.display(), source = %source.display(), "source restored");
                    report.restore(&source);
                }
                Err(Error::Vault(VaultError::Malformed(_))) => {
                    warn!(vault = %vault.display(), "malformed vault file, skipping");
                    report.malformed(&vault);
                }
                Err(e) => {
                    warn!(vault = %vault.display(), error = %e, "decryption failed");
                    report.fail(FileError::new(&vault, e));
                }
            }
        }

        info!(
            total = report.total,
            succeeded = report.succeeded,
            skipped = report.skipped,
            malformed = report.malformed,
            failed = report.failed,
            "refresh finished"
        );
        report
    }

    fn restore_one(&self, vault: &Path, source: &Path) -> Result<()> {
        let contents = fs::read_to_string(vault)?;
        let decoded =
            codec::decode(&contents).ok_or_else(|| VaultError::Malformed(vault.to_path_buf()))?;
        let ciphertext = decoded.ciphertext_bytes(vault)?;

        let mut input = self.scratch()?;
        input.write_all(&ciphertext)?;
        input.flush()?;

        // Decrypt next to the destination so the final rename is atomic and a
        // failed decrypt never truncates an existing source.
        let output = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(parent_dir(source))?;
        self.cipher.decrypt_file(input.path(), output.path())?;

        let restored = checksum(output.path())?;
        if restored != decoded.checksum {
            warn!(
                vault = %vault.display(),
                stored = %decoded.checksum,
                restored = %restored,
                "restored content does not match stored checksum"
            );
        }

        output.persist(source).map_err(|e| e.error)?;
        Ok(())
    }
}
