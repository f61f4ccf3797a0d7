//! Sync command: the default encrypt + refresh cycle.

use crate::cli::{check, encrypt, output, refresh, Context};
use crate::error::Result;

/// Encrypt changed sources, restore missing ones, optionally check-ignore.
///
/// Without `force`, refresh only restores missing plaintext. With it, every
/// vault is re-encrypted and every plaintext is overwritten.
pub fn execute(ctx: Context, force: bool, check_ignore: bool) -> Result<bool> {
    let engine = ctx.engine()?;
    let (encrypted, refreshed) = engine.sync(force);

    output::heading("Encrypt");
    encrypt::print(&encrypted);
    output::heading("Refresh");
    refresh::print(&refreshed);
    let mut clean = !encrypted.has_failures() && !refreshed.has_failures();

    if check_ignore {
        output::heading("Ignore check");
        clean &= check::print_check(&check::run_check(&ctx));
    }
    Ok(clean)
}
