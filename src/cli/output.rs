//! Terminal rendering of operation reports.
//!
//! Every report line starts with a [`Mark`]. Per-file failures go to stderr,
//! everything else to stdout, so `--json` output and tallies can be piped
//! separately from errors. Styling is dropped when `NO_COLOR` is set.

use std::fmt::Display;
use std::path::Path;

use console::Style;
use serde::Serialize;

use crate::core::domain::FileError;
use crate::error::{Error, Result};

/// Leading mark of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// File written, removed, or already in order.
    Done,
    /// Needs the user's attention but is not a failure.
    Attention,
    /// Operation failed for this item.
    Failed,
    /// Nothing to do.
    Idle,
}

impl Mark {
    fn glyph(self) -> &'static str {
        match self {
            Self::Done => "✓",
            Self::Attention => "⚠",
            Self::Failed => "✗",
            Self::Idle => "·",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Done => Style::new().green(),
            Self::Attention => Style::new().yellow(),
            Self::Failed => Style::new().red(),
            Self::Idle => Style::new().dim(),
        }
    }
}

fn paint(style: &Style, value: impl Display) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        value.to_string()
    } else {
        style.apply_to(value).to_string()
    }
}

/// A marked line: `✓ all 3 plaintext files ignored by git`.
pub fn line(mark: Mark, msg: &str) {
    let text = format!("{} {}", paint(&mark.style(), mark.glyph()), msg);
    if mark == Mark::Failed {
        eprintln!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Outcome for one file: `✓ created config/app.env.vault`.
pub fn file(mark: Mark, verb: &str, file: &Path) {
    line(mark, &format!("{} {}", verb, path(file)));
}

/// Per-file failures recorded by the engine, one stderr line each.
pub fn failures(errors: &[FileError]) {
    for failure in errors {
        line(
            Mark::Failed,
            &format!("{}: {}", path(&failure.path), failure.message),
        );
    }
}

/// Closing summary of a batch: `3 files: 1 created, 2 unchanged`.
///
/// Zero counts are left out; an empty batch prints `empty` instead.
pub fn tally(total: usize, noun: &str, counts: &[(usize, &str)], empty: &str) {
    let text = if total == 0 {
        empty.to_string()
    } else {
        let parts: Vec<String> = counts
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, label)| format!("{} {}", n, label))
            .collect();
        format!("{}: {}", plural(total, noun), parts.join(", "))
    };
    println!("{}", paint(&Style::new().dim(), text));
}

/// Bold title above a group of lines.
pub fn heading(title: &str) {
    println!("{}", paint(&Style::new().bold(), title));
}

/// Indented `label  value` pair.
pub fn field(label: &str, value: impl Display) {
    println!(
        "  {}  {}",
        paint(&Style::new().dim(), label),
        paint(&Style::new().bold(), value)
    );
}

/// Suggested next step: `→ run vaulttool sync`.
pub fn hint(msg: &str) {
    let arrow = Style::new().cyan();
    println!("{} {}", paint(&arrow, "→"), paint(&arrow, msg));
}

pub fn path(p: &Path) -> String {
    paint(&Style::new().cyan(), p.display())
}

pub fn cmd(c: &str) -> String {
    paint(&Style::new().green(), c)
}

/// Print a value as pretty JSON on stdout.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::Other(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// `1 file` / `2 files`.
pub fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}
