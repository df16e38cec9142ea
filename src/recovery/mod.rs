//! Page recovery
//!
//! Copies one page from a known-good replica over a damaged page, but only
//! after every safety gate has passed.
//!
//! # Invariants
//!
//! - A destination page with a valid header is never overwritten
//! - No write happens before every gate has been evaluated
//! - A present but malformed page is a fault, never treated as empty
//! - No retries; every fault ends the run

mod decision;
mod errors;
mod outcome;

pub use decision::{
    evaluate, DecisionState, Mode, RecoveryContext, RecoveryDecision, RecoveryRequest,
};
pub use errors::{RecoveryError, RecoveryResult, Side};
pub use outcome::{Check, DecisionEvent, Outcome, Refusal};
