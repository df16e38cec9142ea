//! Page decoding errors

use thiserror::Error;

use super::PAGE_SIZE;

/// Result type for page decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A page buffer that is present but cannot hold a header.
///
/// A missing page is never a decode error; it decodes to the all-zero header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid page size: got {len} bytes, expected {}", PAGE_SIZE)]
    InvalidSize { len: usize },
}

impl DecodeError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::InvalidSize { .. } => "PAGEFIX_PAGE_INVALID_SIZE",
        }
    }
}
