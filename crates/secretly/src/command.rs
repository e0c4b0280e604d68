//! Subcommands
//!
//! Every subcommand implements [`Command`]: it reports the token it answers
//! to, parses its own flags in `init`, and performs one vault call in `run`.
//! Flags use the classic single-dash style (`-name db`, `-name=db`); the
//! double-dash forms are accepted too.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice};
use std::io::Write;
use tracing::debug;

use crate::error::CliError;
use crate::vault::Vault;

/// A single subcommand of the CLI
pub trait Command {
    /// The subcommand token this command answers to
    fn name(&self) -> &'static str;

    /// Parse the tokens following the subcommand into bound fields
    fn init(&mut self, args: &[String]) -> Result<(), CliError>;

    /// Validate bound fields, call the vault, and write user-facing output
    fn run(&self, vault: &mut dyn Vault, out: &mut dyn Write) -> Result<(), CliError>;
}

/// Build the flag parser for a subcommand. Every flag takes one string value.
fn flag_set(
    name: &'static str,
    about: &'static str,
    flags: &[(&'static str, &'static str)],
) -> clap::Command {
    let mut cmd = clap::Command::new(name)
        .about(about)
        .no_binary_name(true)
        .args_override_self(true)
        .color(ColorChoice::Never);

    for &(flag, help) in flags {
        cmd = cmd.arg(
            Arg::new(flag)
                .long(flag)
                .value_name("STRING")
                .help(help)
                .num_args(1)
                .action(ArgAction::Set)
                .allow_hyphen_values(true),
        );
    }

    cmd
}

/// Rewrite single-dash long flags (`-name`) into the `--name` form clap
/// expects. Tokens in value position are passed through untouched.
fn normalize_flags(args: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(args.len());
    let mut expecting_value = false;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if expecting_value {
            normalized.push(arg.clone());
            expecting_value = false;
        } else if arg == "--" {
            normalized.push(arg.clone());
            normalized.extend(iter.by_ref().cloned());
        } else if arg == "-h" || arg == "-help" {
            normalized.push("--help".to_string());
        } else if arg.starts_with("--") {
            expecting_value = !arg.contains('=');
            normalized.push(arg.clone());
        } else if arg.len() > 1 && arg.starts_with('-') {
            expecting_value = !arg.contains('=');
            normalized.push(format!("-{}", arg));
        } else {
            normalized.push(arg.clone());
        }
    }

    normalized
}

/// Parse `args` against `flags`, separating help requests from parse errors
fn parse_flags(flags: clap::Command, args: &[String]) -> Result<ArgMatches, CliError> {
    flags
        .try_get_matches_from(normalize_flags(args))
        .map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp => CliError::Help(e.to_string()),
            _ => CliError::from_clap(&e),
        })
}

fn string_flag(matches: &ArgMatches, flag: &str) -> String {
    matches.get_one::<String>(flag).cloned().unwrap_or_default()
}

/// Fail with a validation error naming every empty required flag
fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), CliError> {
    let empty: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(flag, _)| format!("-{}", flag))
        .collect();

    if empty.is_empty() {
        Ok(())
    } else {
        Err(CliError::Validation(empty.join(", ")))
    }
}

const SET: &str = "set";
const GET: &str = "get";

#[derive(Debug)]
struct SetArgs {
    name: String,
    value: String,
    key: String,
}

/// `set -name <name> -value <value> -key <key>`
#[derive(Debug, Default)]
pub struct SetCommand {
    args: Option<SetArgs>,
}

impl SetCommand {
    pub fn new() -> Self {
        Self::default()
    }

    fn flags() -> clap::Command {
        flag_set(
            SET,
            "Store a secret under a name, encrypted with a key",
            &[
                ("name", "the name of the secret to be stored"),
                ("value", "secret to be stored"),
                ("key", "encryption key used for encrypting/decrypting secrets"),
            ],
        )
    }
}

impl Command for SetCommand {
    fn name(&self) -> &'static str {
        SET
    }

    fn init(&mut self, args: &[String]) -> Result<(), CliError> {
        let matches = parse_flags(Self::flags(), args)?;
        self.args = Some(SetArgs {
            name: string_flag(&matches, "name"),
            value: string_flag(&matches, "value"),
            key: string_flag(&matches, "key"),
        });
        Ok(())
    }

    fn run(&self, vault: &mut dyn Vault, out: &mut dyn Write) -> Result<(), CliError> {
        let args = self.args.as_ref().ok_or(CliError::NotInitialized(SET))?;
        require_non_empty(&[
            ("name", args.name.as_str()),
            ("value", args.value.as_str()),
            ("key", args.key.as_str()),
        ])?;

        debug!(name = %args.name, "storing secret");
        vault.set(&args.name, &args.value, &args.key)?;

        writeln!(out, "success: Secret stored: {}", args.name)?;
        Ok(())
    }
}

#[derive(Debug)]
struct GetArgs {
    name: String,
    key: String,
}

/// `get -name <name> -key <key>`
#[derive(Debug, Default)]
pub struct GetCommand {
    args: Option<GetArgs>,
}

impl GetCommand {
    pub fn new() -> Self {
        Self::default()
    }

    fn flags() -> clap::Command {
        flag_set(
            GET,
            "Retrieve and print a secret",
            &[
                ("name", "the name of the secret to be retrieved"),
                ("key", "encryption key used for encrypting/decrypting secrets"),
            ],
        )
    }
}

impl Command for GetCommand {
    fn name(&self) -> &'static str {
        GET
    }

    fn init(&mut self, args: &[String]) -> Result<(), CliError> {
        let matches = parse_flags(Self::flags(), args)?;
        self.args = Some(GetArgs {
            name: string_flag(&matches, "name"),
            key: string_flag(&matches, "key"),
        });
        Ok(())
    }

    fn run(&self, vault: &mut dyn Vault, out: &mut dyn Write) -> Result<(), CliError> {
        let args = self.args.as_ref().ok_or(CliError::NotInitialized(GET))?;
        require_non_empty(&[("name", args.name.as_str()), ("key", args.key.as_str())])?;

        debug!(name = %args.name, "retrieving secret");
        let value = vault.get(&args.name, &args.key)?;

        writeln!(out, "{}", value)?;
        Ok(())
    }
}
