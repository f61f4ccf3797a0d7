//! Command-line interface.

pub mod check;
pub mod completions;
pub mod encrypt;
pub mod keygen;
pub mod output;
pub mod refresh;
pub mod remove;
pub mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::engine::Engine;
use crate::core::ignore::IgnoreList;
use crate::error::Result;

/// vaulttool - keep plaintext secrets and encrypted vault files in sync.
#[derive(Parser)]
#[command(
    name = "vaulttool",
    about = "Keep plaintext secret files and their encrypted vault copies in sync",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: search .vaulttool.toml, ~/.vaulttool/, /etc/vaulttool/)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt new or changed source files into vault files
    Encrypt {
        /// Re-encrypt even when the checksum is unchanged
        #[arg(short, long)]
        force: bool,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore plaintext files from vault files
    Refresh {
        /// Only restore missing files; keep existing plaintext
        #[arg(long)]
        no_force: bool,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every vault file
    Remove {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that plaintext files are ignored by git
    CheckIgnore,

    /// Show the sync state of every file
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encrypt changes, then restore missing plaintext files
    Sync {
        /// Force re-encryption and overwrite plaintext from vaults
        #[arg(short, long)]
        force: bool,
        /// Also check that plaintext files are ignored by git
        #[arg(long)]
        check_ignore: bool,
    },

    /// Generate an age key file (for backend = "age")
    Keygen {
        /// Where to write the key
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Loaded configuration plus the ignore list of the working directory.
pub struct Context {
    pub config: Config,
    pub ignore: IgnoreList,
}

impl Context {
    /// Load configuration and bind the ignore list to the current directory.
    ///
    /// The automated-context flag comes from `VAULTTOOL_PRECOMMIT`; any
    /// non-empty value counts.
    pub fn load(config_path: Option<&std::path::Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let root = std::env::current_dir()?;
        let automated = std::env::var_os(constants::PRECOMMIT_ENV)
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        Ok(Self {
            config,
            ignore: IgnoreList::new(root).automated(automated),
        })
    }

    /// Engine with pre-flight checks and the configured cipher.
    pub fn engine(&self) -> Result<Engine> {
        Engine::open(self.config.clone(), self.ignore.clone())
    }
}

/// Execute a command.
///
/// Returns `Ok(false)` when the command ran but reported failures, so the
/// caller can exit non-zero.
pub fn execute(cli: Cli) -> Result<bool> {
    use Command::*;

    let config = cli.config.as_deref();
    match cli.command {
        Encrypt { force, json } => encrypt::execute(Context::load(config)?, force, json),
        Refresh { no_force, json } => refresh::execute(Context::load(config)?, !no_force, json),
        Remove { json } => remove::execute(Context::load(config)?, json),
        CheckIgnore => check::check_ignore(Context::load(config)?),
        Status { json } => check::status(Context::load(config)?, json),
        Sync {
            force,
            check_ignore,
        } => sync::execute(Context::load(config)?, force, check_ignore),
        Keygen { path, force } => keygen::execute(&path, force),
        Completions { shell } => completions::execute(shell),
    }
}
