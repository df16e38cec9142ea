//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - TRACE/INFO/WARN go to stdout, ERROR/FATAL to stderr
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Decision detail, shown with --verbose
    Trace = 0,
    /// Normal progress
    Info = 1,
    /// Refusals and other non-fault stops
    Warn = 2,
    /// Faults
    Error = 3,
    /// Run aborted
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn to_stderr(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON-lines logger with a minimum severity.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    min_severity: Severity,
}

impl Logger {
    /// Logger that drops lines below `min_severity`.
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }

    /// INFO and above, or everything when `verbose`.
    pub fn for_verbosity(verbose: bool) -> Self {
        Self::new(if verbose { Severity::Trace } else { Severity::Info })
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Log an event with the given severity and fields
    pub fn log<V: AsRef<str>>(&self, severity: Severity, event: &str, fields: &[(&str, V)]) {
        if !self.enabled(severity) {
            return;
        }
        let line = format_line(severity, event, fields);
        if severity.to_stderr() {
            write_line(&mut io::stderr(), &line);
        } else {
            write_line(&mut io::stdout(), &line);
        }
    }

    pub fn trace<V: AsRef<str>>(&self, event: &str, fields: &[(&str, V)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info<V: AsRef<str>>(&self, event: &str, fields: &[(&str, V)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn<V: AsRef<str>>(&self, event: &str, fields: &[(&str, V)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error<V: AsRef<str>>(&self, event: &str, fields: &[(&str, V)]) {
        self.log(Severity::Error, event, fields);
    }

    pub fn fatal<V: AsRef<str>>(&self, event: &str, fields: &[(&str, V)]) {
        self.log(Severity::Fatal, event, fields);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    // Logging never fails the run.
    let _ = writer.write_all(line.as_bytes());
    let _ = writer.flush();
}

/// Render one log line, newline included.
pub(crate) fn format_line<V: AsRef<str>>(
    severity: Severity,
    event: &str,
    fields: &[(&str, V)],
) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":");
    push_json_string(&mut output, event);
    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push(',');
        push_json_string(&mut output, key);
        output.push(':');
        push_json_string(&mut output, value.as_ref());
    }

    output.push_str("}\n");
    output
}

fn push_json_string(output: &mut String, s: &str) {
    output.push('"');
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
    output.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FIELDS: &[(&str, &str)] = &[];

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_verbosity_threshold() {
        assert!(!Logger::for_verbosity(false).enabled(Severity::Trace));
        assert!(Logger::for_verbosity(false).enabled(Severity::Info));
        assert!(Logger::for_verbosity(true).enabled(Severity::Trace));
    }

    #[test]
    fn test_line_is_json() {
        let line = format_line(
            Severity::Warn,
            "REPLACE_REFUSED",
            &[("reason", "source page is empty")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "REPLACE_REFUSED");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["reason"], "source page is empty");
    }

    #[test]
    fn test_fields_sorted_and_event_first() {
        let a = format_line(Severity::Info, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = format_line(Severity::Info, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
    }

    #[test]
    fn test_escapes_and_single_line() {
        let line = format_line(Severity::Info, "E", &[("path", "/odd \"dir\"\nname\u{1}")]);
        assert_eq!(line.matches('\n').count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["path"], "/odd \"dir\"\nname\u{1}");
    }

    #[test]
    fn test_owned_values() {
        let fields = vec![("bytes", 8192.to_string())];
        let line = format_line(Severity::Trace, "PAGE_FETCHED", &fields);
        assert!(line.contains("\"bytes\":\"8192\""));
        assert!(format_line(Severity::Info, "E", NO_FIELDS).ends_with("}\n"));
    }
}
