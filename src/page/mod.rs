//! On-disk page format
//!
//! A relation is stored as a sequence of fixed-size pages split across
//! segment files. Only the 24-byte header at the start of every page is
//! interpreted here; page bodies are copied as opaque bytes.
//!
//! # Layout constants
//!
//! The constants below encode the storage engine's physical format. They are
//! compile-time values and are never read from configuration.

mod address;
mod errors;
mod header;
mod policy;

pub use address::PageAddress;
pub use errors::{DecodeError, DecodeResult};
pub use header::{decode, PageHeader};
pub use policy::{are_equivalent, is_empty, is_valid};

/// Size of one page in bytes.
pub const PAGE_SIZE: usize = 8192;

/// Number of pages held by one segment file.
pub const SEGMENT_CAPACITY: u64 = 131072;

/// Page layout version packed into the low bits of `page_layout_version`.
pub const PAGE_LAYOUT_VERSION: u16 = 4;

/// Size of the page header in bytes.
pub const PAGE_HEADER_SIZE: usize = 24;

/// Raw page bytes: exactly `PAGE_SIZE` long, or empty when the page does not exist.
pub type PageBuffer = Vec<u8>;
