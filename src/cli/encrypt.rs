//! Encrypt command.

use crate::cli::output::{self, Mark};
use crate::cli::Context;
use crate::core::domain::{EncryptAction, EncryptReport};
use crate::error::Result;

/// Encrypt changed source files.
pub fn execute(ctx: Context, force: bool, json: bool) -> Result<bool> {
    let engine = ctx.engine()?;
    let report = engine.encrypt(force);

    if json {
        output::json(&report)?;
    } else {
        print(&report);
    }
    Ok(!report.has_failures())
}

/// Human-readable encrypt report. Unchanged files only show in the tally.
pub(crate) fn print(report: &EncryptReport) {
    for change in &report.changes {
        let verb = match change.action {
            EncryptAction::Created => "created",
            EncryptAction::Updated => "updated",
            EncryptAction::Skipped => continue,
        };
        output::file(Mark::Done, verb, &change.vault);
    }
    output::failures(&report.errors);
    output::tally(
        report.total,
        "file",
        &[
            (report.created, "created"),
            (report.updated, "updated"),
            (report.skipped, "unchanged"),
            (report.failed, "failed"),
        ],
        "no source files matched",
    );
}
