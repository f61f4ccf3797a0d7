//! Diagnostic commands: check-ignore and status.

use crate::cli::output::{self, Mark};
use crate::cli::Context;
use crate::core::constants;
use crate::core::domain::{FileState, IgnoreReport};
use crate::core::engine;
use crate::core::ignore::{GitCheckIgnore, IgnoreCheck};
use crate::error::Result;

/// Verify every source file is ignored by version control.
///
/// Uses `git check-ignore` inside a work tree and falls back to a literal
/// lookup in `.gitignore` otherwise.
pub fn check_ignore(ctx: Context) -> Result<bool> {
    let report = run_check(&ctx);
    Ok(print_check(&report))
}

pub(crate) fn run_check(ctx: &Context) -> IgnoreReport {
    let root = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let git = GitCheckIgnore::new(root);
    let checker: &dyn IgnoreCheck = if git.available() {
        &git
    } else {
        tracing::debug!("not a git work tree, checking {} directly", constants::IGNORE_FILE);
        &ctx.ignore
    };
    engine::check_ignore(&ctx.config, checker)
}

/// Print the check result. Returns `true` when everything is ignored.
pub(crate) fn print_check(report: &IgnoreReport) -> bool {
    if report.is_clean() {
        output::line(
            Mark::Done,
            &format!(
                "all {} ignored by git",
                output::plural(report.checked, "plaintext file")
            ),
        );
        return true;
    }

    for path in &report.not_ignored {
        output::file(Mark::Attention, "not ignored", path);
    }
    output::failures(&report.errors);
    if !report.not_ignored.is_empty() {
        output::hint(&format!(
            "run {} to add them to {}",
            output::cmd("vaulttool encrypt"),
            constants::IGNORE_FILE
        ));
    }
    false
}

/// Show the sync state of every file.
pub fn status(ctx: Context, json: bool) -> Result<bool> {
    let states = engine::status(&ctx.config)?;

    if json {
        let rows: Vec<_> = states
            .iter()
            .map(|(path, state)| serde_json::json!({ "path": path, "state": state }))
            .collect();
        output::json(&rows)?;
        return Ok(true);
    }

    output::heading("Vault status");
    output::field("suffix", &ctx.config.options.suffix);
    output::field("key file", ctx.config.options.key_file.display());

    let mut pending = 0;
    for (path, state) in &states {
        let mark = match state {
            FileState::BothSynced => Mark::Done,
            FileState::Absent => Mark::Idle,
            FileState::SourceOnly | FileState::VaultOnly | FileState::BothStale => {
                pending += 1;
                Mark::Attention
            }
        };
        output::file(mark, &format!("{:<13}", state.label()), path);
    }

    output::tally(
        states.len(),
        "file",
        &[(states.len() - pending, "in order"), (pending, "pending")],
        "no source or vault files found",
    );
    if pending > 0 {
        output::hint(&format!("run {}", output::cmd("vaulttool sync")));
    }
    Ok(true)
}
