//! secretly - Store and retrieve named secrets from the command line
//!
//! Each secret is sealed with an encryption key chosen by the caller at
//! `set` time, and only that key opens it again at `get` time. The CLI is a
//! thin dispatcher: subcommands parse their own flags and make exactly one
//! call into a [`Vault`].
//!
//! The on-disk vault uses age passphrase encryption (scrypt + ChaCha20-Poly1305).

pub mod command;
pub mod dispatch;
pub mod error;
pub mod memory;
pub mod vault;

pub use command::{Command, GetCommand, SetCommand};
pub use dispatch::Dispatcher;
pub use error::CliError;
pub use memory::MemoryVault;
pub use vault::{FileVault, OpenOptions, Vault, VaultError};

/// Name of the store every invocation opens
pub const STORE_NAME: &str = "secretly-cli";
