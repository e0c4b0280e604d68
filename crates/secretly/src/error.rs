use thiserror::Error;

use crate::vault::VaultError;

/// Errors surfaced by the command layer
#[derive(Error, Debug)]
pub enum CliError {
    /// No subcommand given; carries the one-line synopsis
    #[error("You must pass a sub command (usage: {0})")]
    MissingSubcommand(String),

    #[error("Unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("{0}")]
    Parse(String),

    /// Help was requested; carries the rendered usage text
    #[error("{0}")]
    Help(String),

    #[error("{0} should not be empty")]
    Validation(String),

    #[error("Command '{0}' was run before its flags were parsed")]
    NotInitialized(&'static str),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Failed to write output")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Build a parse error from clap's rendered message, keeping a single line
    pub(crate) fn from_clap(err: &clap::Error) -> Self {
        let rendered = err.to_string();
        let line = rendered
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("invalid flags");
        Self::Parse(line.trim_start_matches("error: ").to_string())
    }
}
