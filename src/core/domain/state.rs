//! Per-file synchronization state.

use std::path::Path;

use serde::Serialize;

use crate::core::codec;
use crate::error::Result;

/// State of one source/vault pair, derived purely from the filesystem.
///
/// `encrypt` moves `SourceOnly` and `BothStale` to `BothSynced`; `refresh`
/// moves `VaultOnly` to `BothSynced`; `remove` drops the vault half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Absent,
    SourceOnly,
    VaultOnly,
    BothSynced,
    BothStale,
}

impl FileState {
    /// Classify the pair `source` / `source + suffix`.
    ///
    /// A vault whose checksum line is missing counts as stale.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if either file exists but cannot be read.
    pub fn classify(source: &Path, suffix: &str) -> Result<Self> {
        let vault = codec::vault_path(source, suffix);
        match (source.exists(), vault.exists()) {
            (false, false) => Ok(Self::Absent),
            (true, false) => Ok(Self::SourceOnly),
            (false, true) => Ok(Self::VaultOnly),
            (true, true) => {
                let current = crate::core::checksum::checksum(source)?;
                let stored = codec::read_checksum(&vault)?;
                if stored.as_deref() == Some(current.as_str()) {
                    Ok(Self::BothSynced)
                } else {
                    Ok(Self::BothStale)
                }
            }
        }
    }

    /// Label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::SourceOnly => "not encrypted",
            Self::VaultOnly => "restorable",
            Self::BothSynced => "in sync",
            Self::BothStale => "stale",
        }
    }
}
