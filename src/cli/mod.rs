//! CLI module for pagefix
//!
//! Parses arguments, resolves configuration, runs one page recovery and maps
//! the outcome to an exit status.

mod args;
mod commands;
mod config;
mod errors;

pub use args::Cli;
pub use commands::{execute, execute_with_audit, run};
pub use config::{Config, RunSettings};
pub use errors::{CliError, CliResult};
