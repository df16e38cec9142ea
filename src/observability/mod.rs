//! Observability for pagefix runs
//!
//! - Structured JSON-lines logging
//! - Typed lifecycle events
//! - Append-only audit log
//!
//! Observability never changes a decision and never fails a run.
//!
//! # Usage
//!
//! ```ignore
//! use pagefix::observability::{log_event_with_fields, Event, Logger};
//!
//! let logger = Logger::for_verbosity(true);
//! log_event_with_fields(&logger, Event::RunStart, &[("page", "42".to_string())]);
//! ```

pub mod audit;
mod events;
mod logger;

pub use audit::{AuditLog, AuditRecord, FileAuditLog, MemoryAuditLog};
pub use events::Event;
pub use logger::{Logger, Severity};

use crate::recovery::DecisionEvent;

/// Log a lifecycle event with fields
pub fn log_event_with_fields<V: AsRef<str>>(logger: &Logger, event: Event, fields: &[(&str, V)]) {
    if event.is_fatal() {
        logger.fatal(event.as_str(), fields);
    } else {
        logger.info(event.as_str(), fields);
    }
}

/// Log the decision trail at TRACE level
pub fn log_decision_trail(logger: &Logger, events: &[DecisionEvent]) {
    if !logger.enabled(Severity::Trace) {
        return;
    }
    for event in events {
        let fields = event.fields();
        logger.trace(event.name(), fields.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{Check, Side};

    #[test]
    fn test_log_event_does_not_panic() {
        let logger = Logger::for_verbosity(false);
        log_event_with_fields(&logger, Event::RunStart, &[("page", "0")]);
        log_event_with_fields(&logger, Event::RunFailed, &[("code", "X")]);
    }

    #[test]
    fn test_trail_logging_does_not_panic() {
        let events = vec![
            DecisionEvent::Fetched {
                side: Side::Source,
                path: "/data/base/1/2".to_string(),
                bytes: 8192,
            },
            DecisionEvent::Checked {
                check: Check::SourceEmpty,
                value: false,
            },
        ];
        log_decision_trail(&Logger::for_verbosity(true), &events);
        log_decision_trail(&Logger::for_verbosity(false), &events);
    }
}
