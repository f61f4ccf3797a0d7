//! Ignore-list maintenance.
//!
//! Every discovered plaintext file is registered in `.gitignore` so it can't
//! be committed by accident. Registration is append-only and idempotent.
//! In an automated context (pre-commit hook, CI) with a `.git` directory
//! present, the list is left untouched.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::core::constants;
use crate::error::{Error, Result};

/// Answers "is this path excluded from version control?".
pub trait IgnoreCheck {
    /// # Errors
    ///
    /// Returns an error if the answer cannot be determined.
    fn is_ignored(&self, path: &Path) -> Result<bool>;
}

/// The `.gitignore` file of a working root.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    root: PathBuf,
    file: PathBuf,
    automated: bool,
}

impl IgnoreList {
    /// Ignore list at `<root>/.gitignore`. Entries are written relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let file = root.join(constants::IGNORE_FILE);
        Self {
            root,
            file,
            automated: false,
        }
    }

    /// Mark the run as automated (pre-commit hook or CI).
    pub fn automated(mut self, automated: bool) -> Self {
        self.automated = automated;
        self
    }

    /// Path of the ignore file.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// True when mutation is suppressed: automated run inside a repository.
    pub fn is_suppressed(&self) -> bool {
        self.automated && self.root.join(constants::VCS_DIR).exists()
    }

    /// Entry that would be written for `path`, or `None` if `path` lies
    /// outside the root.
    pub fn entry_for(&self, path: &Path) -> Option<String> {
        let root = normalize(&self.root);
        let absolute = if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.root.join(path))
        };
        let rel = absolute.strip_prefix(&root).ok()?;

        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }

    /// Current entries, trimmed, without blank lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file exists but cannot be read.
    pub fn entries(&self) -> Result<HashSet<String>> {
        if !self.file.exists() {
            return Ok(HashSet::new());
        }
        let contents = fs::read_to_string(&self.file)?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Make sure `path` is listed, creating the file if needed.
    ///
    /// Returns `true` when a new entry was appended.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or written.
    pub fn ensure(&self, path: &Path) -> Result<bool> {
        if self.is_suppressed() {
            debug!(path = %path.display(), "automated run, leaving ignore list untouched");
            return Ok(false);
        }

        let Some(entry) = self.entry_for(path) else {
            debug!(path = %path.display(), "outside working root, not adding to ignore list");
            return Ok(false);
        };

        if !self.file.exists() {
            fs::write(&self.file, "")?;
        }

        let existing = fs::read_to_string(&self.file)?;
        if existing.lines().any(|l| l.trim() == entry) {
            return Ok(false);
        }

        let mut file = OpenOptions::new().append(true).open(&self.file)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        writeln!(file, "{}", entry)?;

        info!(entry = %entry, "added to {}", constants::IGNORE_FILE);
        Ok(true)
    }
}

/// Literal lookup in the ignore file. Used when git itself is unavailable.
impl IgnoreCheck for IgnoreList {
    fn is_ignored(&self, path: &Path) -> Result<bool> {
        match self.entry_for(path) {
            Some(entry) => Ok(self.entries()?.contains(&entry)),
            None => Ok(false),
        }
    }
}

/// `git check-ignore` run from the working root.
#[derive(Debug, Clone)]
pub struct GitCheckIgnore {
    root: PathBuf,
}

impl GitCheckIgnore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// True when `git` is installed and `root` is inside a work tree.
    pub fn available(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&self.root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl IgnoreCheck for GitCheckIgnore {
    fn is_ignored(&self, path: &Path) -> Result<bool> {
        let output = Command::new("git")
            .arg("check-ignore")
            .arg("-q")
            .arg(path)
            .current_dir(&self.root)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        // 0: ignored, 1: not ignored, anything else: git failed
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::Other(format!(
                "git check-ignore failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_ensure_creates_file_and_appends() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path());

        assert!(list.ensure(&tmp.path().join("secret.env")).unwrap());
        assert_eq!(lines(list.path()), vec!["secret.env"]);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path());
        let path = tmp.path().join("config").join("db.env");

        assert!(list.ensure(&path).unwrap());
        assert!(!list.ensure(&path).unwrap());
        assert!(!list.ensure(Path::new("./config/db.env")).unwrap());
        assert_eq!(lines(list.path()), vec!["config/db.env"]);
    }

    #[test]
    fn test_ensure_preserves_existing_content() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path());
        fs::write(list.path(), "target/\n  a.env  \nno-newline").unwrap();

        assert!(!list.ensure(&tmp.path().join("a.env")).unwrap());
        assert!(list.ensure(&tmp.path().join("b.env")).unwrap());
        assert_eq!(
            lines(list.path()),
            vec!["target/", "  a.env  ", "no-newline", "b.env"]
        );
    }

    #[test]
    fn test_automated_run_with_repo_is_noop() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        let list = IgnoreList::new(tmp.path()).automated(true);

        assert!(list.is_suppressed());
        assert!(!list.ensure(&tmp.path().join("a.env")).unwrap());
        assert!(!list.path().exists());
    }

    #[test]
    fn test_automated_run_without_repo_still_writes() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path()).automated(true);

        assert!(!list.is_suppressed());
        assert!(list.ensure(&tmp.path().join("a.env")).unwrap());
    }

    #[test]
    fn test_paths_outside_root_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        fs::create_dir(&root).unwrap();
        let list = IgnoreList::new(&root);

        assert_eq!(list.entry_for(&tmp.path().join("elsewhere.key")), None);
        assert!(!list.ensure(&tmp.path().join("elsewhere.key")).unwrap());
        assert!(!list.path().exists());
    }

    #[test]
    fn test_entry_for_normalizes() {
        let list = IgnoreList::new("/work/repo");
        assert_eq!(
            list.entry_for(Path::new("/work/repo/./a/../b/c.env")).as_deref(),
            Some("b/c.env")
        );
        assert_eq!(
            list.entry_for(Path::new("sub/x.env")).as_deref(),
            Some("sub/x.env")
        );
        assert_eq!(list.entry_for(Path::new("/work/repo")), None);
    }

    #[test]
    fn test_ignore_list_as_check() {
        let tmp = TempDir::new().unwrap();
        let list = IgnoreList::new(tmp.path());
        let a = tmp.path().join("a.env");
        let b = tmp.path().join("b.env");
        list.ensure(&a).unwrap();

        assert!(list.is_ignored(&a).unwrap());
        assert!(!list.is_ignored(&b).unwrap());
    }
}
