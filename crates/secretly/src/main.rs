//! secretly - Store and retrieve named secrets
//!
//! Commands:
//! - set -name <NAME> -value <VALUE> -key <KEY>: Store a secret
//! - get -name <NAME> -key <KEY>: Retrieve a secret

use anyhow::{Context, Result};
use secretly::{Dispatcher, FileVault, OpenOptions, STORE_NAME};
use secretly_core::{Config, Paths};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let vault_dir = paths.vault_dir();
    let mut vault = FileVault::open(
        &vault_dir,
        STORE_NAME,
        OpenOptions {
            create_if_missing: true,
        },
    )
    .with_context(|| format!("Failed to open vault in {}", vault_dir.display()))?;
    tracing::debug!(store = %vault.path().display(), "vault opened");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    Dispatcher::new().dispatch(args, &mut vault, &mut out)?;
    out.flush()?;

    Ok(())
}
