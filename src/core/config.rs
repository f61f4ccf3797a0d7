//! Configuration file management.
//!
//! Handles locating, reading and validating `.vaulttool.toml`. The engine
//! consumes an already-validated [`Config`] and never re-checks it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Project configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root directories to search, in order.
    pub include_directories: Vec<PathBuf>,
    /// Any candidate whose path contains one of these substrings is rejected.
    pub exclude_directories: Vec<String>,
    /// A candidate must match at least one of these glob patterns.
    pub include_patterns: Vec<String>,
    /// A candidate matching any of these glob patterns is rejected.
    pub exclude_patterns: Vec<String>,
    /// Cipher and naming options.
    pub options: Options,
}

/// The `[options]` section.
#[derive(Debug, Clone, Serialize)]
pub struct Options {
    /// Vault file suffix (always contains a dot).
    pub suffix: String,
    /// Key file handed to the cipher backend.
    pub key_file: PathBuf,
    /// OpenSSL cipher name, e.g. `aes-256-cbc`.
    pub algorithm: String,
    /// OpenSSL executable name or path.
    pub openssl_path: String,
    /// Which cipher backend to use.
    pub backend: Backend,
}

/// Cipher backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Shell out to `openssl enc` with a passphrase key file.
    #[default]
    OpenSsl,
    /// Native age encryption; the key file holds an x25519 identity.
    Age,
}

/// On-disk shape. Every top-level key is optional here so a missing one can
/// be reported by name instead of as a generic parse error.
#[derive(Debug, Deserialize)]
struct RawConfig {
    include_directories: Option<Vec<PathBuf>>,
    exclude_directories: Option<Vec<String>>,
    include_patterns: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    options: Option<RawOptions>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    suffix: Option<String>,
    key_file: Option<PathBuf>,
    algorithm: Option<String>,
    openssl_path: Option<String>,
    #[serde(default)]
    backend: Backend,
}

impl Options {
    /// Options with defaults for everything but the key file.
    pub fn new(key_file: impl Into<PathBuf>) -> Self {
        Self {
            suffix: constants::DEFAULT_SUFFIX.to_string(),
            key_file: key_file.into(),
            algorithm: constants::DEFAULT_ALGORITHM.to_string(),
            openssl_path: constants::DEFAULT_OPENSSL.to_string(),
            backend: Backend::default(),
        }
    }
}

impl Config {
    /// Configuration searching `directories` for `patterns`, with no exclusions.
    pub fn new(directories: Vec<PathBuf>, patterns: Vec<String>, options: Options) -> Self {
        Self {
            include_directories: directories,
            exclude_directories: Vec::new(),
            include_patterns: patterns,
            exclude_patterns: Vec::new(),
            options,
        }
    }

    /// Candidate configuration files, in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(constants::USER_CONFIG_FILE));
        }
        paths.push(PathBuf::from(constants::SYSTEM_CONFIG_FILE));
        paths
    }

    /// Load configuration from `explicit`, or from the first existing file in
    /// [`Config::search_paths`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no file exists, or a parse/validation
    /// error if the file is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => Self::search_paths(),
        };

        let path = candidates
            .iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                searched: candidates.clone(),
            })?;

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::from_toml(&contents)?;

        debug!(
            directories = config.include_directories.len(),
            patterns = config.include_patterns.len(),
            suffix = %config.options.suffix,
            "config loaded"
        );
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// The keys may sit at the top level or inside a `[vaulttool]` table.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(contents).map_err(ConfigError::Parse)?;
        let value = match table.remove(constants::CONFIG_TABLE) {
            Some(toml::Value::Table(inner)) => toml::Value::Table(inner),
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    field: constants::CONFIG_TABLE,
                    reason: "expected a table".to_string(),
                }
                .into())
            }
            None => toml::Value::Table(table),
        };
        let raw: RawConfig = value.try_into().map_err(ConfigError::Parse)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let include_directories = raw.include_directories.ok_or(ConfigError::MissingField {
            field: "include_directories",
        })?;
        let exclude_directories = raw.exclude_directories.ok_or(ConfigError::MissingField {
            field: "exclude_directories",
        })?;
        let include_patterns = raw.include_patterns.ok_or(ConfigError::MissingField {
            field: "include_patterns",
        })?;
        let exclude_patterns = raw.exclude_patterns.ok_or(ConfigError::MissingField {
            field: "exclude_patterns",
        })?;
        let options = raw
            .options
            .ok_or(ConfigError::MissingField { field: "options" })?;

        let key_file = options.key_file.ok_or(ConfigError::MissingField {
            field: "options.key_file",
        })?;

        let config = Self {
            include_directories,
            exclude_directories,
            include_patterns,
            exclude_patterns,
            options: Options {
                suffix: normalize_suffix(
                    options
                        .suffix
                        .as_deref()
                        .unwrap_or(constants::DEFAULT_SUFFIX),
                )?,
                key_file,
                algorithm: options
                    .algorithm
                    .unwrap_or_else(|| constants::DEFAULT_ALGORITHM.to_string()),
                openssl_path: options
                    .openssl_path
                    .unwrap_or_else(|| constants::DEFAULT_OPENSSL.to_string()),
                backend: options.backend,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate structure and contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.include_patterns.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "include_patterns",
                reason: "at least one pattern is required".to_string(),
            }
            .into());
        }

        let patterns = [
            ("include_patterns", &self.include_patterns),
            ("exclude_patterns", &self.exclude_patterns),
        ];
        for (field, list) in patterns {
            for pattern in list {
                if let Err(e) = glob::Pattern::new(pattern) {
                    return Err(ConfigError::InvalidValue {
                        field,
                        reason: format!("invalid glob '{}': {}", pattern, e),
                    }
                    .into());
                }
            }
        }

        if self.options.key_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "options.key_file",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if self.options.suffix.is_empty() || !self.options.suffix.contains('.') {
            return Err(ConfigError::InvalidValue {
                field: "options.suffix",
                reason: format!("'{}' must contain a dot", self.options.suffix),
            }
            .into());
        }

        Ok(())
    }

    /// Checks that must pass before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::KeyFileMissing` if the key file does not exist, or
    /// `ConfigError::CipherBinaryMissing` if the OpenSSL backend is selected and
    /// its executable cannot be resolved.
    pub fn preflight(&self) -> Result<()> {
        if !self.options.key_file.exists() {
            return Err(ConfigError::KeyFileMissing(self.options.key_file.clone()).into());
        }

        if self.options.backend == Backend::OpenSsl
            && which::which(&self.options.openssl_path).is_err()
        {
            return Err(ConfigError::CipherBinaryMissing(self.options.openssl_path.clone()).into());
        }

        debug!(backend = ?self.options.backend, "preflight passed");
        Ok(())
    }
}

/// Apply the suffix rules: it must contain a dot, and a suffix that does not
/// start with `.` gets an `_` separator unless it already has one.
fn normalize_suffix(suffix: &str) -> Result<String> {
    if !suffix.contains('.') {
        return Err(ConfigError::InvalidValue {
            field: "options.suffix",
            reason: format!("'{}' must contain a dot (e.g. .vault, prod.vault)", suffix),
        }
        .into());
    }

    if suffix.starts_with('.') || suffix.starts_with('_') {
        Ok(suffix.to_string())
    } else {
        Ok(format!("_{}", suffix))
    }
}
