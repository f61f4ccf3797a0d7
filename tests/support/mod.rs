//! Test support utilities for vaulttool integration tests.
//!
//! Provides reusable project setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own project dir and home dir. Child processes run with
/// `.current_dir()` so tests can run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an empty environment with no configuration.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Environment with an age key file and a `.vaulttool.toml` matching `*.env`.
    pub fn init() -> Self {
        Self::with_config(&config_toml(&["*.env"], &[]))
    }

    /// Environment with an age key file and the given configuration.
    pub fn with_config(toml: &str) -> Self {
        let t = Self::new();
        vaulttool::core::cipher::generate_identity(&t.path(KEY_FILE))
            .expect("failed to generate key file");
        t.write(".vaulttool.toml", toml);
        t
    }

    /// Absolute path of a project-relative file.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a project file, creating parent directories.
    pub fn write(&self, rel: impl AsRef<Path>, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(path, contents).expect("failed to write file");
    }

    /// Read a project file.
    pub fn read(&self, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path(rel)).expect("failed to read file")
    }

    /// True when the project file exists.
    pub fn exists(&self, rel: impl AsRef<Path>) -> bool {
        self.path(rel).exists()
    }

    /// Entries of the project's `.gitignore`.
    pub fn ignore_entries(&self) -> Vec<String> {
        if !self.exists(".gitignore") {
            return Vec::new();
        }
        self.read(".gitignore")
            .lines()
            .map(str::to_string)
            .collect()
    }
}
