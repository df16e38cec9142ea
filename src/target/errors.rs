//! # Page Target Errors

use thiserror::Error;

/// Result type for target operations
pub type TargetResult<T> = Result<T, TargetError>;

/// Transport or I/O fault while reading or writing a page range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("read failed for {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("write failed for {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("invalid target reference '{0}'")]
    InvalidRef(String),
}

impl TargetError {
    pub(crate) fn read(path: impl Into<String>, reason: impl ToString) -> Self {
        TargetError::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<String>, reason: impl ToString) -> Self {
        TargetError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TargetError::Read { .. } => "PAGEFIX_TARGET_READ_FAILED",
            TargetError::Write { .. } => "PAGEFIX_TARGET_WRITE_FAILED",
            TargetError::InvalidRef(_) => "PAGEFIX_TARGET_INVALID_REF",
        }
    }
}
