//! secretly-core - Shared paths and configuration for the secretly CLI

pub mod config;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
