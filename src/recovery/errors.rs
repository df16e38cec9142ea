//! Recovery error types
//!
//! Faults abort the single-page run immediately. Refusals are not errors;
//! they are reported through [`Outcome::Refused`](super::Outcome::Refused).

use std::fmt;

use thiserror::Error;

use crate::page::DecodeError;
use crate::target::TargetError;

/// Which page a fault or event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The known-good replica page
    Source,
    /// The damaged page being repaired
    Destination,
    /// The extract file written in dump mode
    Dump,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Destination => "destination",
            Side::Dump => "dump",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fatal fault during a recovery run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("{side} page read failed: {source}")]
    Read {
        side: Side,
        #[source]
        source: TargetError,
    },

    #[error("{side} page at {path} is malformed: {source}")]
    Decode {
        side: Side,
        path: String,
        #[source]
        source: DecodeError,
    },

    #[error("{side} page write failed: {source}")]
    Write {
        side: Side,
        #[source]
        source: TargetError,
    },
}

impl RecoveryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecoveryError::Read { .. } => "PAGEFIX_READ_FAILED",
            RecoveryError::Decode { .. } => "PAGEFIX_DECODE_FAILED",
            RecoveryError::Write { .. } => "PAGEFIX_WRITE_FAILED",
        }
    }

    /// The page the fault concerns
    pub fn side(&self) -> Side {
        match self {
            RecoveryError::Read { side, .. }
            | RecoveryError::Decode { side, .. }
            | RecoveryError::Write { side, .. } => *side,
        }
    }
}

/// Result type for recovery operations
pub type RecoveryResult<T> = Result<T, RecoveryError>;
