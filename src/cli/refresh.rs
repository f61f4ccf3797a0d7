//! Refresh command.

use crate::cli::output::{self, Mark};
use crate::cli::Context;
use crate::core::domain::RefreshReport;
use crate::error::Result;

/// Restore plaintext from vault files.
pub fn execute(ctx: Context, force: bool, json: bool) -> Result<bool> {
    let engine = ctx.engine()?;
    let report = engine.refresh(force);

    if json {
        output::json(&report)?;
    } else {
        print(&report);
    }
    Ok(!report.has_failures())
}

/// Human-readable refresh report.
pub(crate) fn print(report: &RefreshReport) {
    for source in &report.restored {
        output::file(Mark::Done, "restored", source);
    }
    for vault in &report.anomalies {
        output::file(Mark::Attention, "skipped malformed", vault);
    }
    output::failures(&report.errors);
    output::tally(
        report.total,
        "vault",
        &[
            (report.succeeded, "restored"),
            (report.skipped, "kept"),
            (report.malformed, "malformed"),
            (report.failed, "failed"),
        ],
        "no vault files found",
    );
}
