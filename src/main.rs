//! vaulttool - keep plaintext secret files and encrypted vault copies in sync.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaulttool::cli::output::{self, Mark};
use vaulttool::cli::{execute, Cli};
use vaulttool::core::constants::LOG_ENV;
use vaulttool::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vaulttool=debug")
        } else {
            EnvFilter::new("vaulttool=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match execute(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let suggestion = match &e {
                Error::Config(ConfigError::NotFound { .. }) => {
                    Some("create .vaulttool.toml or pass --config")
                }
                Error::Config(ConfigError::KeyFileMissing(_)) => {
                    Some("set options.key_file, or run: vaulttool keygen <path>")
                }
                Error::Config(ConfigError::CipherBinaryMissing(_)) => {
                    Some("install OpenSSL or set options.openssl_path")
                }
                _ => None,
            };

            output::line(Mark::Failed, &e.to_string());
            if let Some(hint) = suggestion {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}
