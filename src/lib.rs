//! pagefix - repair a single corrupted database page from a healthy replica
//!
//! The page header is decoded on both sides and the source page is copied
//! over the destination only when the destination is provably damaged and the
//! source provably sound.

pub mod cli;
pub mod observability;
pub mod page;
pub mod recovery;
pub mod target;
