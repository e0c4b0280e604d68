//! Subcommand dispatch
//!
//! The dispatcher owns the registry of commands, picks the one whose name
//! matches the first token, and runs it against the vault it is handed.

use std::io::Write;
use tracing::debug;

use crate::command::{Command, GetCommand, SetCommand};
use crate::error::CliError;
use crate::vault::Vault;

/// Routes a command line to the matching [`Command`]
pub struct Dispatcher {
    commands: Vec<Box<dyn Command>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// The built-in registry: `get` and `set`
    pub fn new() -> Self {
        let commands: Vec<Box<dyn Command>> =
            vec![Box::new(GetCommand::new()), Box::new(SetCommand::new())];
        Self::with_commands(commands)
    }

    /// A registry of arbitrary commands, matched in insertion order
    pub fn with_commands(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    /// Names of the registered commands, in registry order
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// One-line synopsis built from the registry
    pub fn synopsis(&self) -> String {
        format!("secretly <{}> [flags]", self.names().join("|"))
    }

    /// Top-level usage text
    pub fn usage(&self) -> String {
        format!(
            "Usage: {}\n\nRun 'secretly <subcommand> -h' for the flags of a subcommand.",
            self.synopsis()
        )
    }

    /// Parse and run one command line (without the program name).
    ///
    /// A command whose flags fail to parse is never run. The registry is
    /// consumed: each command is initialized and run at most once. The help
    /// tokens only print usage when no registered command claims them.
    pub fn dispatch(
        self,
        argv: &[String],
        vault: &mut dyn Vault,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        let Some((subcommand, rest)) = argv.split_first() else {
            return Err(CliError::MissingSubcommand(self.synopsis()));
        };

        let usage = self.usage();
        let Some(mut command) = self
            .commands
            .into_iter()
            .find(|c| c.name() == subcommand.as_str())
        else {
            if matches!(subcommand.as_str(), "help" | "-h" | "-help" | "--help") {
                writeln!(out, "{}", usage)?;
                return Ok(());
            }
            debug!(%subcommand, "no matching subcommand");
            return Err(CliError::UnknownSubcommand(subcommand.clone()));
        };

        debug!(subcommand = command.name(), "dispatching");
        match command.init(rest) {
            Ok(()) => command.run(vault, out),
            Err(CliError::Help(help)) => {
                write!(out, "{}", help)?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
