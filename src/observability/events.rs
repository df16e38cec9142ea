//! Lifecycle events of a recovery run
//!
//! Events are explicit and typed. Decision detail (headers, gates) is carried
//! by [`DecisionEvent`](crate::recovery::DecisionEvent); these are the
//! milestones logged on every run.

use std::fmt;

/// Observable events in a pagefix run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration resolved
    ConfigLoaded,
    /// Run begins
    RunStart,
    /// Destination page replaced
    PageReplaced,
    /// Pretend run found a replace would happen
    ReplacePretended,
    /// Source page dumped
    PageDumped,
    /// Pretend run found a dump would happen
    DumpPretended,
    /// A safety gate stopped the run
    ReplaceRefused,
    /// Read, decode or write fault (FATAL)
    RunFailed,
    /// Audit record could not be written
    AuditFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RunStart => "RUN_START",
            Event::PageReplaced => "PAGE_REPLACED",
            Event::ReplacePretended => "REPLACE_PRETENDED",
            Event::PageDumped => "PAGE_DUMPED",
            Event::DumpPretended => "DUMP_PRETENDED",
            Event::ReplaceRefused => "REPLACE_REFUSED",
            Event::RunFailed => "RUN_FAILED",
            Event::AuditFailed => "AUDIT_FAILED",
        }
    }

    /// Events that end the run with a fault
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::RunFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
