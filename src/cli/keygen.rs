//! Keygen command.

use std::path::Path;

use crate::cli::output::{self, Mark};
use crate::core::cipher;
use crate::error::{Error, Result};

/// Write a fresh age identity to `path`.
pub fn execute(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Err(Error::Other(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let public_key = cipher::generate_identity(path)?;
    output::file(Mark::Done, "wrote key to", path);
    output::field("public key", &public_key);
    output::hint("set backend = \"age\" and key_file in .vaulttool.toml");
    Ok(true)
}
