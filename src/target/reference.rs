//! Target reference parsing
//!
//! Syntax: `[user@host:]path`. A string without `:` is a local path, and so
//! is one whose host part is empty (`:/data` is the local path `/data`).

use std::fmt;
use std::str::FromStr;

use super::errors::TargetError;

/// A data root or file, either local or on a remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    /// `user@host` or `host`; `None` for local access
    pub host: Option<String>,
    /// Filesystem path on that host
    pub path: String,
}

impl TargetRef {
    /// Local reference to `path`.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            host: None,
            path: path.into(),
        }
    }

    /// Remote reference to `path` on `host`.
    pub fn remote(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            path: path.into(),
        }
    }

    /// Splits a reference string on its first `:`.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((host, path)) if !host.is_empty() => Self::remote(host, path),
            Some((_, path)) => Self::local(path),
            None => Self::local(reference),
        }
    }

    pub fn is_local(&self) -> bool {
        self.host.is_none()
    }

    /// Path of `relative` below this reference's path.
    pub fn join(&self, relative: &str) -> String {
        if self.path.is_empty() {
            return relative.to_string();
        }
        format!("{}/{}", self.path.trim_end_matches('/'), relative)
    }
}

impl FromStr for TargetRef {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = Self::parse(s);
        if parsed.path.is_empty() {
            return Err(TargetError::InvalidRef(s.to_string()));
        }
        Ok(parsed)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{}:{}", host, self.path),
            None => write!(f, "{}", self.path),
        }
    }
}
