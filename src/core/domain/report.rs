//! Operation reports.
//!
//! Batch operations never stop at the first bad file. Each one returns a
//! report with per-outcome totals and the list of files that failed, which
//! is the whole output contract surfaced to the CLI.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A file that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

impl FileError {
    pub fn new(path: &Path, message: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// What encrypt did with one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptAction {
    /// No vault existed before.
    Created,
    /// An existing vault was rewritten.
    Updated,
    /// Vault checksum matched and the run was not forced.
    Skipped,
}

/// A vault written by encrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultChange {
    pub source: PathBuf,
    pub vault: PathBuf,
    pub action: EncryptAction,
}

/// Result of `encrypt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncryptReport {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Vaults that were created or updated.
    pub changes: Vec<VaultChange>,
    pub errors: Vec<FileError>,
}

impl EncryptReport {
    pub(crate) fn record(&mut self, source: &Path, vault: &Path, action: EncryptAction) {
        self.total += 1;
        match action {
            EncryptAction::Created => self.created += 1,
            EncryptAction::Updated => self.updated += 1,
            EncryptAction::Skipped => {
                self.skipped += 1;
                return;
            }
        }
        self.changes.push(VaultChange {
            source: source.to_path_buf(),
            vault: vault.to_path_buf(),
            action,
        });
    }

    pub(crate) fn fail(&mut self, error: FileError) {
        self.total += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    /// Number of vault files written.
    pub fn written(&self) -> usize {
        self.created + self.updated
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Result of `refresh`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub total: usize,
    pub succeeded: usize,
    /// Source already present and the run was not forced.
    pub skipped: usize,
    /// Vault files with fewer than two lines.
    pub malformed: usize,
    pub failed: usize,
    /// Source files written.
    pub restored: Vec<PathBuf>,
    /// Malformed vault files that were skipped.
    pub anomalies: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl RefreshReport {
    pub(crate) fn restore(&mut self, source: &Path) {
        self.total += 1;
        self.succeeded += 1;
        self.restored.push(source.to_path_buf());
    }

    pub(crate) fn skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub(crate) fn malformed(&mut self, vault: &Path) {
        self.total += 1;
        self.malformed += 1;
        self.anomalies.push(vault.to_path_buf());
    }

    pub(crate) fn fail(&mut self, error: FileError) {
        self.total += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Result of `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    pub removed: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl RemoveReport {
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of `check_ignore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IgnoreReport {
    pub checked: usize,
    /// Source files version control would pick up.
    pub not_ignored: Vec<PathBuf>,
    /// Files whose status could not be determined.
    pub errors: Vec<FileError>,
}

impl IgnoreReport {
    /// True when every source file is known to be ignored.
    pub fn is_clean(&self) -> bool {
        self.not_ignored.is_empty() && self.errors.is_empty()
    }
}
