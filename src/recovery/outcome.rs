//! Decision outcomes and the audit trail of a run

use std::fmt;

use super::errors::Side;
use crate::page::PageHeader;

/// Why a replace was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Source header is all zero
    SourceEmpty,
    /// Destination header is all zero
    DestinationEmpty,
    /// Source header fails the layout check
    SourceInvalid,
    /// Destination is valid and identical to the source
    DestinationAlreadyValidAndEquivalent,
    /// Destination is valid but differs from the source
    DestinationAlreadyValidButDifferent,
}

impl Refusal {
    pub fn code(&self) -> &'static str {
        match self {
            Refusal::SourceEmpty => "PAGEFIX_REFUSED_SOURCE_EMPTY",
            Refusal::DestinationEmpty => "PAGEFIX_REFUSED_DESTINATION_EMPTY",
            Refusal::SourceInvalid => "PAGEFIX_REFUSED_SOURCE_INVALID",
            Refusal::DestinationAlreadyValidAndEquivalent => "PAGEFIX_REFUSED_ALREADY_FIXED",
            Refusal::DestinationAlreadyValidButDifferent => {
                "PAGEFIX_REFUSED_DESTINATION_VALID_DIFFERENT"
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Refusal::SourceEmpty => "source page is empty",
            Refusal::DestinationEmpty => "destination page is empty",
            Refusal::SourceInvalid => "source page header is not valid",
            Refusal::DestinationAlreadyValidAndEquivalent => {
                "destination page is already valid and identical to the source (already fixed)"
            }
            Refusal::DestinationAlreadyValidButDifferent => {
                "destination page is already valid but differs from the source; not overwriting"
            }
        }
    }
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Terminal result of a run that did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Destination page was overwritten with the source page
    Replaced,
    /// Pretend mode: every gate passed, nothing written
    WouldReplace,
    /// Source page was written to the dump file
    Dumped,
    /// Pretend mode: source page would have been dumped
    WouldDump,
    /// A safety gate stopped the run
    Refused(Refusal),
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Replaced => "REPLACED",
            Outcome::WouldReplace => "WOULD_REPLACE",
            Outcome::Dumped => "DUMPED",
            Outcome::WouldDump => "WOULD_DUMP",
            Outcome::Refused(_) => "REFUSED",
        }
    }

    /// Whether the run should exit successfully
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Refused(_))
    }

    /// Whether the run changed any bytes on disk
    pub fn wrote(&self) -> bool {
        matches!(self, Outcome::Replaced | Outcome::Dumped)
    }

    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            Outcome::Refused(reason) => Some(*reason),
            _ => None,
        }
    }

    /// One-line human summary
    pub fn describe(&self) -> String {
        match self {
            Outcome::Replaced => "destination page replaced with source page".to_string(),
            Outcome::WouldReplace => {
                "pretend: destination page would be replaced with source page".to_string()
            }
            Outcome::Dumped => "source page dumped".to_string(),
            Outcome::WouldDump => "pretend: source page would be dumped".to_string(),
            Outcome::Refused(reason) => format!("refusing to replace: {}", reason),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Predicate evaluated by a safety gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    SourceEmpty,
    DestinationEmpty,
    SourceValid,
    DestinationValid,
    HeadersEquivalent,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::SourceEmpty => "source_empty",
            Check::DestinationEmpty => "destination_empty",
            Check::SourceValid => "source_valid",
            Check::DestinationValid => "destination_valid",
            Check::HeadersEquivalent => "headers_equivalent",
        }
    }
}

/// One fact established during a run, in the order it was established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionEvent {
    /// A page was located on disk
    Located {
        side: Side,
        path: String,
        segment: u64,
        offset_in_segment: u64,
    },
    /// Page bytes were fetched
    Fetched { side: Side, path: String, bytes: usize },
    /// A header was decoded
    HeaderDecoded { side: Side, header: PageHeader },
    /// A predicate was evaluated
    Checked { check: Check, value: bool },
    /// The final write was skipped because of pretend mode
    WriteSkipped { side: Side, path: String },
    /// The final write completed
    Written { side: Side, path: String, bytes: usize },
}

impl DecisionEvent {
    /// Event name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            DecisionEvent::Located { .. } => "PAGE_LOCATED",
            DecisionEvent::Fetched { .. } => "PAGE_FETCHED",
            DecisionEvent::HeaderDecoded { .. } => "HEADER_DECODED",
            DecisionEvent::Checked { .. } => "GATE_CHECKED",
            DecisionEvent::WriteSkipped { .. } => "WRITE_SKIPPED",
            DecisionEvent::Written { .. } => "PAGE_WRITTEN",
        }
    }

    /// Key/value fields for structured output
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            DecisionEvent::Located {
                side,
                path,
                segment,
                offset_in_segment,
            } => vec![
                ("side", side.to_string()),
                ("path", path.clone()),
                ("segment", segment.to_string()),
                ("offset", offset_in_segment.to_string()),
            ],
            DecisionEvent::Fetched { side, path, bytes } => vec![
                ("side", side.to_string()),
                ("path", path.clone()),
                ("bytes", bytes.to_string()),
            ],
            DecisionEvent::HeaderDecoded { side, header } => vec![
                ("side", side.to_string()),
                ("lsn", header.lsn_display()),
                ("checksum", header.checksum.to_string()),
                ("flags", header.flags.to_string()),
                ("lower", header.lower_offset.to_string()),
                ("upper", header.upper_offset.to_string()),
                ("special", header.special_offset.to_string()),
                ("layout_version", header.page_layout_version.to_string()),
                ("prune_xid", header.prune_transaction_id.to_string()),
            ],
            DecisionEvent::Checked { check, value } => vec![
                ("check", check.as_str().to_string()),
                ("value", value.to_string()),
            ],
            DecisionEvent::WriteSkipped { side, path } => {
                vec![("side", side.to_string()), ("path", path.clone())]
            }
            DecisionEvent::Written { side, path, bytes } => vec![
                ("side", side.to_string()),
                ("path", path.clone()),
                ("bytes", bytes.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_refusals_fail() {
        assert!(Outcome::Replaced.is_success());
        assert!(Outcome::WouldReplace.is_success());
        assert!(Outcome::Dumped.is_success());
        assert!(Outcome::WouldDump.is_success());
        assert!(!Outcome::Refused(Refusal::SourceEmpty).is_success());
    }

    #[test]
    fn test_wrote() {
        assert!(Outcome::Replaced.wrote());
        assert!(Outcome::Dumped.wrote());
        assert!(!Outcome::WouldReplace.wrote());
        assert!(!Outcome::Refused(Refusal::DestinationEmpty).wrote());
    }

    #[test]
    fn test_refusal_codes_distinct() {
        let all = [
            Refusal::SourceEmpty,
            Refusal::DestinationEmpty,
            Refusal::SourceInvalid,
            Refusal::DestinationAlreadyValidAndEquivalent,
            Refusal::DestinationAlreadyValidButDifferent,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_describe_mentions_reason() {
        let text = Outcome::Refused(Refusal::DestinationAlreadyValidAndEquivalent).describe();
        assert!(text.contains("already fixed"));
    }

    #[test]
    fn test_header_event_fields() {
        let event = DecisionEvent::HeaderDecoded {
            side: Side::Source,
            header: PageHeader {
                page_layout_version: 8196,
                ..PageHeader::empty()
            },
        };
        let fields = event.fields();
        assert!(fields.contains(&("layout_version", "8196".to_string())));
        assert!(fields.contains(&("side", "source".to_string())));
        assert_eq!(event.name(), "HEADER_DECODED");
    }
}
