//! Page targets
//!
//! A target reads and writes page-aligned byte ranges of files that live
//! either on the local filesystem or on a remote host. The replace decision
//! only sees the [`PageTarget`] trait and never branches on transport kind.

mod errors;
mod local;
mod reference;
mod remote;

pub use errors::{TargetError, TargetResult};
pub use local::LocalTarget;
pub use reference::TargetRef;
pub use remote::{RemoteShellTarget, ShellTemplate, DEFAULT_REMOTE_SHELL, HOST_PLACEHOLDER};

use crate::page::PageBuffer;

/// Byte-range access to page files.
pub trait PageTarget: std::fmt::Debug {
    /// Read up to one page starting at page `offset_in_pages` of `path`.
    ///
    /// A missing file yields an empty buffer. A short result means the file
    /// ends before a full page.
    fn read_range(&self, path: &str, offset_in_pages: u64) -> TargetResult<PageBuffer>;

    /// Overwrite `buffer.len()` bytes at page `offset_in_pages` of `path`.
    ///
    /// Never creates, truncates or otherwise resizes the file.
    fn write_range(&self, path: &str, offset_in_pages: u64, buffer: &[u8]) -> TargetResult<()>;

    /// Create or truncate `path` and fill it with `buffer`.
    fn write_file(&self, path: &str, buffer: &[u8]) -> TargetResult<()>;
}

/// Transport settings shared by every target of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Command template used for remote references
    pub remote_shell: ShellTemplate,
    /// fsync local files after writing
    pub sync_writes: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            remote_shell: ShellTemplate::default(),
            sync_writes: true,
        }
    }
}

/// Pick the transport for `reference`.
pub fn open_target(reference: &TargetRef, options: &TransportOptions) -> Box<dyn PageTarget> {
    match &reference.host {
        None => Box::new(LocalTarget::new(options.sync_writes)),
        Some(host) => Box::new(RemoteShellTarget::new(
            host.clone(),
            options.remote_shell.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_target_by_kind() {
        let options = TransportOptions::default();

        let local = open_target(&TargetRef::parse("/data"), &options);
        assert!(format!("{:?}", local).starts_with("LocalTarget"));

        let remote = open_target(&TargetRef::parse("u@h:/data"), &options);
        assert!(format!("{:?}", remote).starts_with("RemoteShellTarget"));
    }
}
