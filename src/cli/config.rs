//! Configuration file
//!
//! Optional JSON file; every field has a default. Command-line flags win over
//! file values. Page geometry is part of the on-disk format and is not
//! configurable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::Cli;
use super::errors::{CliError, CliResult};
use crate::target::{ShellTemplate, TransportOptions, DEFAULT_REMOTE_SHELL};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Command template for remote targets (default "ssh {host}")
    #[serde(default = "default_remote_shell")]
    pub remote_shell: String,

    /// fsync local files after writing (default true)
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,

    /// Append-only audit log path (default: none)
    #[serde(default)]
    pub audit_log: Option<PathBuf>,
}

fn default_remote_shell() -> String {
    DEFAULT_REMOTE_SHELL.to_string()
}

fn default_sync_writes() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_shell: default_remote_shell(),
            sync_writes: default_sync_writes(),
            audit_log: None,
        }
    }
}

/// Checked settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub transport: TransportOptions,
    pub audit_log: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file. Values are checked by [`Config::resolve`].
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// File values (or defaults) with command-line overrides applied, then checked.
    pub fn resolve(cli: &Cli) -> CliResult<RunSettings> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(shell) = &cli.remote_shell {
            config.remote_shell = shell.clone();
        }
        if let Some(path) = &cli.audit_log {
            config.audit_log = Some(path.clone());
        }

        config.into_settings()
    }

    fn into_settings(self) -> CliResult<RunSettings> {
        let remote_shell = ShellTemplate::parse(&self.remote_shell)
            .ok_or_else(|| CliError::config_error("remote_shell must not be empty"))?;

        Ok(RunSettings {
            transport: TransportOptions {
                remote_shell,
                sync_writes: self.sync_writes,
            },
            audit_log: self.audit_log,
        })
    }
}
