//! File discovery.
//!
//! Walks the configured directories and yields candidate source files and
//! vault files. Both sequences are lazy, finite, and can be re-created at
//! will; nothing is cached between calls. No ordering is guaranteed.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::core::config::Config;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Plaintext files selected by the include/exclude rules.
///
/// A file is yielded when it matches at least one include pattern, no exclude
/// pattern, its path contains none of the excluded directory substrings, and
/// it is not itself a vault file.
pub fn source_files(config: &Config) -> impl Iterator<Item = PathBuf> + '_ {
    let includes = compile(&config.include_patterns);
    let excludes = compile(&config.exclude_patterns);
    let suffix = config.options.suffix.as_str();

    config.include_directories.iter().flat_map(move |root| {
        let includes = includes.clone();
        let excludes = excludes.clone();
        walk_files(root).filter(move |path| {
            let rel = path.strip_prefix(root).unwrap_or(path);
            if !includes.iter().any(|p| matches_tail(p, rel)) {
                return false;
            }
            if is_vault_file(path, suffix) {
                return false;
            }
            if excludes.iter().any(|p| matches_tail(p, rel)) {
                trace!(path = %path.display(), "excluded by pattern");
                return false;
            }
            let display = path.to_string_lossy();
            if config
                .exclude_directories
                .iter()
                .any(|d| display.contains(d.as_str()))
            {
                trace!(path = %path.display(), "excluded by directory");
                return false;
            }
            true
        })
    })
}

/// Every file under the include directories whose name ends with the suffix.
pub fn vault_files(config: &Config) -> impl Iterator<Item = PathBuf> + '_ {
    let suffix = config.options.suffix.as_str();
    config
        .include_directories
        .iter()
        .flat_map(move |root| walk_files(root).filter(move |p| is_vault_file(p, suffix)))
}

fn is_vault_file(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.len() > suffix.len() && n.ends_with(suffix))
        .unwrap_or(false)
}

fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        // Links are not descended into, but a link to a file is a candidate.
        .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
        .map(|e| e.into_path())
}

/// Validated patterns; invalid ones are dropped (config validation rejects them
/// up front).
///
/// Leading `./` and `**/` segments are stripped: every pattern already
/// matches at any depth, and `**/*.env` must also match at the root.
fn compile(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| {
            let mut raw = p.as_str();
            while let Some(rest) = raw.strip_prefix("./").or_else(|| raw.strip_prefix("**/")) {
                raw = rest;
            }
            Pattern::new(raw).ok()
        })
        .collect()
}

/// Match `pattern` against the trailing components of `path`.
///
/// A pattern with N components is compared with the last N components of the
/// path, so `*.env` matches a file at any depth and `config/*.env` matches
/// only files directly inside a `config` directory.
fn matches_tail(pattern: &Pattern, path: &Path) -> bool {
    let wanted = pattern.as_str().split('/').count();
    let components: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if components.len() < wanted {
        return false;
    }
    let tail = components[components.len() - wanted..].join("/");
    pattern.matches_with(&tail, MATCH_OPTIONS)
}
