//! Operations that need no cipher: remove, check-ignore, status.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::codec;
use crate::core::config::Config;
use crate::core::discovery;
use crate::core::domain::{FileError, FileState, IgnoreReport, RemoveReport};
use crate::core::ignore::IgnoreCheck;
use crate::error::Result;

/// Delete every vault file under the include directories.
///
/// Sources are never touched. A file that cannot be deleted is recorded and
/// the rest are still removed.
pub fn remove(config: &Config) -> RemoveReport {
    let mut report = RemoveReport::default();

    // Collect first so deletions don't race the directory walk.
    let vaults: Vec<PathBuf> = discovery::vault_files(config).collect();
    for vault in vaults {
        match fs::remove_file(&vault) {
            Ok(()) => {
                info!(vault = %vault.display(), "vault removed");
                report.removed.push(vault);
            }
            Err(e) => {
                warn!(vault = %vault.display(), error = %e, "failed to remove vault");
                report.errors.push(FileError::new(&vault, e));
            }
        }
    }

    info!(
        removed = report.removed.len(),
        failed = report.errors.len(),
        "remove finished"
    );
    report
}

/// Ask `checker` about every discovered source file. Read-only.
pub fn check_ignore(config: &Config, checker: &dyn IgnoreCheck) -> IgnoreReport {
    let mut report = IgnoreReport::default();

    for source in discovery::source_files(config) {
        report.checked += 1;
        match checker.is_ignored(&source) {
            Ok(true) => debug!(source = %source.display(), "ignored"),
            Ok(false) => {
                warn!(source = %source.display(), "not ignored by version control");
                report.not_ignored.push(source);
            }
            Err(e) => report.errors.push(FileError::new(&source, e)),
        }
    }

    report
}

/// State of every source file and every vault-only pair, sorted by path.
///
/// # Errors
///
/// Returns `Error::Io` if a present file cannot be read.
pub fn status(config: &Config) -> Result<Vec<(PathBuf, FileState)>> {
    let suffix = config.options.suffix.as_str();
    let mut states = BTreeMap::new();

    for source in discovery::source_files(config) {
        let state = FileState::classify(&source, suffix)?;
        states.insert(source, state);
    }
    for source in missing_sources(config) {
        states.insert(source, FileState::VaultOnly);
    }

    Ok(states.into_iter().collect())
}

/// Source paths whose vault exists but whose plaintext does not.
pub fn missing_sources(config: &Config) -> Vec<PathBuf> {
    let suffix = config.options.suffix.as_str();
    discovery::vault_files(config)
        .filter_map(|vault| codec::source_path(&vault, suffix))
        .filter(|source| !source.exists())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checksum::checksum_bytes;
    use crate::core::config::Options;
    use crate::core::ignore::IgnoreList;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(root: &Path) -> Config {
        Config::new(
            vec![root.to_path_buf()],
            vec!["*.env".to_string()],
            Options::new(root.join("vault.key")),
        )
    }

    #[test]
    fn test_remove_only_vault_files() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.txt.vault", "b.env.vault", "c.json.vault"] {
            fs::write(tmp.path().join(name), "vaulted").unwrap();
        }
        fs::write(tmp.path().join("notvaulted.txt"), "plain").unwrap();
        fs::write(tmp.path().join("b.env"), "B=1").unwrap();

        let report = remove(&config(tmp.path()));
        let mut removed: Vec<String> = report
            .removed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        removed.sort();

        assert_eq!(removed, vec!["a.txt.vault", "b.env.vault", "c.json.vault"]);
        assert!(!report.has_failures());
        assert!(tmp.path().join("notvaulted.txt").exists());
        assert!(tmp.path().join("b.env").exists());
        assert!(!tmp.path().join("a.txt.vault").exists());
    }

    #[test]
    fn test_remove_nothing_to_do() {
        let tmp = TempDir::new().unwrap();
        let report = remove(&config(tmp.path()));
        assert!(report.removed.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_check_ignore_lists_offenders_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path());
        fs::write(tmp.path().join("a.env"), "A=1").unwrap();
        fs::write(tmp.path().join("b.env"), "B=1").unwrap();
        list.ensure(&tmp.path().join("a.env")).unwrap();
        let before = fs::read_to_string(list.path()).unwrap();

        let report = check_ignore(&config(tmp.path()), &list);
        assert_eq!(report.checked, 2);
        assert_eq!(report.not_ignored, vec![tmp.path().join("b.env")]);
        assert!(!report.is_clean());
        assert_eq!(fs::read_to_string(list.path()).unwrap(), before);
    }

    #[test]
    fn test_status_and_missing_sources() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("new.env"), "N=1").unwrap();
        fs::write(tmp.path().join("synced.env"), "S=1").unwrap();
        fs::write(
            tmp.path().join("synced.env.vault"),
            codec::encode(&checksum_bytes(b"S=1"), b"c"),
        )
        .unwrap();
        fs::write(
            tmp.path().join("gone.env.vault"),
            codec::encode(&checksum_bytes(b"G=1"), b"c"),
        )
        .unwrap();

        let config = config(tmp.path());
        assert_eq!(missing_sources(&config), vec![tmp.path().join("gone.env")]);

        let states = status(&config).unwrap();
        assert_eq!(
            states,
            vec![
                (tmp.path().join("gone.env"), FileState::VaultOnly),
                (tmp.path().join("new.env"), FileState::SourceOnly),
                (tmp.path().join("synced.env"), FileState::BothSynced),
            ]
        );
    }
}
