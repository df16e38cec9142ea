//! Replace-or-refuse decision
//!
//! # Sequence (strict order)
//!
//! 1. Locate source and destination segments
//! 2. Fetch and decode the source page (fatal on read or size fault)
//! 3. Dump mode: write the source page to the dump file and stop
//! 4. Fetch and decode the destination page (same fatal conditions)
//! 5. Gates, first failure wins:
//!    source empty, destination empty, source invalid, destination valid
//! 6. Write the source page over the destination (skipped in pretend mode)
//!
//! A destination whose header is valid is never written.

use super::errors::{RecoveryError, RecoveryResult, Side};
use super::outcome::{Check, DecisionEvent, Outcome, Refusal};
use crate::page::{self, PageAddress, PageBuffer, PageHeader};
use crate::target::{PageTarget, TargetRef};

/// What the run should do with the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gate-checked copy of the source page over the destination page
    Replace,
    /// Copy the source page into a standalone file, no destination gates
    Dump,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Replace => "replace",
            Mode::Dump => "dump",
        }
    }
}

/// Inputs of a single-page run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRequest {
    /// Absolute page number within the relation
    pub page_number: u64,
    /// Relation file path relative to the data roots
    pub relation: String,
    /// Data root holding the good page
    pub source: TargetRef,
    /// Data root holding the damaged page, or the dump file in dump mode
    pub destination: TargetRef,
    pub mode: Mode,
    /// Evaluate everything, write nothing
    pub pretend: bool,
}

/// Paths and offsets resolved from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryContext {
    pub address: PageAddress,
    pub source_path: String,
    pub destination_path: String,
}

impl RecoveryContext {
    pub fn resolve(request: &RecoveryRequest) -> Self {
        let address = PageAddress::locate(&request.relation, request.page_number);
        let source_path = request.source.join(&address.segment_file);
        let destination_path = match request.mode {
            Mode::Replace => request.destination.join(&address.segment_file),
            Mode::Dump => request.destination.path.clone(),
        };

        Self {
            address,
            source_path,
            destination_path,
        }
    }
}

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Start,
    Fetching,
    DumpOnly,
    Deciding,
    Finished(Outcome),
    Failed,
}

/// One replace-or-refuse run.
///
/// Holds the trail of every fact it established so callers can audit the
/// decision, including runs that ended in a fault.
#[derive(Debug)]
pub struct RecoveryDecision<'a> {
    request: &'a RecoveryRequest,
    context: RecoveryContext,
    source: &'a dyn PageTarget,
    destination: &'a dyn PageTarget,
    state: DecisionState,
    events: Vec<DecisionEvent>,
    source_header: Option<PageHeader>,
    destination_header: Option<PageHeader>,
}

impl<'a> RecoveryDecision<'a> {
    pub fn new(
        request: &'a RecoveryRequest,
        source: &'a dyn PageTarget,
        destination: &'a dyn PageTarget,
    ) -> Self {
        Self {
            request,
            context: RecoveryContext::resolve(request),
            source,
            destination,
            state: DecisionState::Start,
            events: Vec::new(),
            source_header: None,
            destination_header: None,
        }
    }

    pub fn context(&self) -> &RecoveryContext {
        &self.context
    }

    pub fn state(&self) -> DecisionState {
        self.state
    }

    pub fn events(&self) -> &[DecisionEvent] {
        &self.events
    }

    pub fn source_header(&self) -> Option<&PageHeader> {
        self.source_header.as_ref()
    }

    pub fn destination_header(&self) -> Option<&PageHeader> {
        self.destination_header.as_ref()
    }

    /// Run the decision to completion.
    pub fn evaluate(&mut self) -> RecoveryResult<Outcome> {
        match self.run() {
            Ok(outcome) => {
                self.state = DecisionState::Finished(outcome);
                Ok(outcome)
            }
            Err(e) => {
                self.state = DecisionState::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self) -> RecoveryResult<Outcome> {
        self.state = DecisionState::Fetching;
        let offset = self.context.address.offset_in_segment;
        let segment = self.context.address.segment;

        self.events.push(DecisionEvent::Located {
            side: Side::Source,
            path: self.context.source_path.clone(),
            segment,
            offset_in_segment: offset,
        });
        let source_path = self.context.source_path.clone();
        let (src_bytes, src_header) = self.fetch(Side::Source, &source_path, offset)?;
        self.source_header = Some(src_header);

        if self.request.mode == Mode::Dump {
            self.state = DecisionState::DumpOnly;
            return self.dump(&src_bytes);
        }

        self.events.push(DecisionEvent::Located {
            side: Side::Destination,
            path: self.context.destination_path.clone(),
            segment,
            offset_in_segment: offset,
        });
        let destination_path = self.context.destination_path.clone();
        let (_, dst_header) = self.fetch(Side::Destination, &destination_path, offset)?;
        self.destination_header = Some(dst_header);

        self.state = DecisionState::Deciding;
        if let Some(refusal) = self.gate(&src_header, &dst_header) {
            return Ok(Outcome::Refused(refusal));
        }

        if self.request.pretend {
            self.events.push(DecisionEvent::WriteSkipped {
                side: Side::Destination,
                path: destination_path,
            });
            return Ok(Outcome::WouldReplace);
        }

        self.destination
            .write_range(&destination_path, offset, &src_bytes)
            .map_err(|source| RecoveryError::Write {
                side: Side::Destination,
                source,
            })?;
        self.events.push(DecisionEvent::Written {
            side: Side::Destination,
            path: destination_path,
            bytes: src_bytes.len(),
        });

        Ok(Outcome::Replaced)
    }

    fn fetch(
        &mut self,
        side: Side,
        path: &str,
        offset: u64,
    ) -> RecoveryResult<(PageBuffer, PageHeader)> {
        let target = match side {
            Side::Source => self.source,
            Side::Destination | Side::Dump => self.destination,
        };

        let bytes = target
            .read_range(path, offset)
            .map_err(|source| RecoveryError::Read { side, source })?;
        self.events.push(DecisionEvent::Fetched {
            side,
            path: path.to_string(),
            bytes: bytes.len(),
        });

        let header = page::decode(&bytes).map_err(|source| RecoveryError::Decode {
            side,
            path: path.to_string(),
            source,
        })?;
        self.events.push(DecisionEvent::HeaderDecoded { side, header });

        Ok((bytes, header))
    }

    fn dump(&mut self, src_bytes: &[u8]) -> RecoveryResult<Outcome> {
        let path = self.context.destination_path.clone();

        if self.request.pretend {
            self.events.push(DecisionEvent::WriteSkipped {
                side: Side::Dump,
                path,
            });
            return Ok(Outcome::WouldDump);
        }

        self.destination
            .write_file(&path, src_bytes)
            .map_err(|source| RecoveryError::Write {
                side: Side::Dump,
                source,
            })?;
        self.events.push(DecisionEvent::Written {
            side: Side::Dump,
            path,
            bytes: src_bytes.len(),
        });

        Ok(Outcome::Dumped)
    }

    fn check(&mut self, check: Check, value: bool) -> bool {
        self.events.push(DecisionEvent::Checked { check, value });
        value
    }

    /// Returns the first failing gate, if any.
    fn gate(&mut self, src: &PageHeader, dst: &PageHeader) -> Option<Refusal> {
        // Emptiness before validity: a zero header is "never written", not corrupt.
        if self.check(Check::SourceEmpty, page::is_empty(src)) {
            return Some(Refusal::SourceEmpty);
        }
        if self.check(Check::DestinationEmpty, page::is_empty(dst)) {
            return Some(Refusal::DestinationEmpty);
        }
        if !self.check(Check::SourceValid, page::is_valid(src)) {
            return Some(Refusal::SourceInvalid);
        }
        if self.check(Check::DestinationValid, page::is_valid(dst)) {
            return if self.check(Check::HeadersEquivalent, page::are_equivalent(src, dst)) {
                Some(Refusal::DestinationAlreadyValidAndEquivalent)
            } else {
                Some(Refusal::DestinationAlreadyValidButDifferent)
            };
        }
        None
    }
}

/// Evaluate `request` once and return its outcome.
pub fn evaluate(
    request: &RecoveryRequest,
    source: &dyn PageTarget,
    destination: &dyn PageTarget,
) -> RecoveryResult<Outcome> {
    RecoveryDecision::new(request, source, destination).evaluate()
}
