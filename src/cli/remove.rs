//! Remove command.

use crate::cli::output::{self, Mark};
use crate::cli::Context;
use crate::core::engine;
use crate::error::Result;

/// Delete every vault file. Needs no key file.
pub fn execute(ctx: Context, json: bool) -> Result<bool> {
    let report = engine::remove(&ctx.config);

    if json {
        output::json(&report)?;
        return Ok(!report.has_failures());
    }

    for vault in &report.removed {
        output::file(Mark::Done, "removed", vault);
    }
    output::failures(&report.errors);
    output::tally(
        report.removed.len() + report.errors.len(),
        "vault",
        &[(report.removed.len(), "removed"), (report.errors.len(), "failed")],
        "no vault files found",
    );

    Ok(!report.has_failures())
}
