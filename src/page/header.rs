//! Page header decoding
//!
//! Header layout (24 bytes, little-endian, no reordering):
//!
//! ```text
//! +--------+------+----------------------+
//! | Offset | Size | Field                |
//! +--------+------+----------------------+
//! |      0 |    8 | log_sequence_number  |
//! |      8 |    2 | checksum             |
//! |     10 |    2 | flags                |
//! |     12 |    2 | lower_offset         |
//! |     14 |    2 | upper_offset         |
//! |     16 |    2 | special_offset       |
//! |     18 |    2 | page_layout_version  |
//! |     20 |    4 | prune_transaction_id |
//! +--------+------+----------------------+
//! ```

use std::fmt;

use super::errors::{DecodeError, DecodeResult};
use super::{PAGE_HEADER_SIZE, PAGE_SIZE};

/// Decoded page header.
///
/// Immutable once decoded. Equality compares all eight fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageHeader {
    /// LSN of the last WAL record that touched the page
    pub log_sequence_number: u64,
    /// Page checksum (not verified)
    pub checksum: u16,
    /// Page flag bits
    pub flags: u16,
    /// Offset to the start of free space
    pub lower_offset: u16,
    /// Offset to the end of free space
    pub upper_offset: u16,
    /// Offset to the start of the special space
    pub special_offset: u16,
    /// Page size OR'ed with the layout version
    pub page_layout_version: u16,
    /// Oldest prunable transaction id, or zero
    pub prune_transaction_id: u32,
}

impl PageHeader {
    /// The header of a page that does not exist.
    pub const fn empty() -> Self {
        Self {
            log_sequence_number: 0,
            checksum: 0,
            flags: 0,
            lower_offset: 0,
            upper_offset: 0,
            special_offset: 0,
            page_layout_version: 0,
            prune_transaction_id: 0,
        }
    }

    /// Parses the header from the first 24 bytes of `data`.
    ///
    /// Callers must have checked that `data` holds at least
    /// `PAGE_HEADER_SIZE` bytes.
    fn read_from(data: &[u8]) -> Self {
        let u16_at = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);

        let mut lsn = [0u8; 8];
        lsn.copy_from_slice(&data[0..8]);
        let mut xid = [0u8; 4];
        xid.copy_from_slice(&data[20..24]);

        Self {
            log_sequence_number: u64::from_le_bytes(lsn),
            checksum: u16_at(8),
            flags: u16_at(10),
            lower_offset: u16_at(12),
            upper_offset: u16_at(14),
            special_offset: u16_at(16),
            page_layout_version: u16_at(18),
            prune_transaction_id: u32::from_le_bytes(xid),
        }
    }

    /// Writes the header into the first 24 bytes of `data`.
    ///
    /// Used to build page images; the repair path never rewrites headers.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than `PAGE_HEADER_SIZE`.
    pub fn encode_into(&self, data: &mut [u8]) {
        let out = &mut data[..PAGE_HEADER_SIZE];
        out[0..8].copy_from_slice(&self.log_sequence_number.to_le_bytes());
        out[8..10].copy_from_slice(&self.checksum.to_le_bytes());
        out[10..12].copy_from_slice(&self.flags.to_le_bytes());
        out[12..14].copy_from_slice(&self.lower_offset.to_le_bytes());
        out[14..16].copy_from_slice(&self.upper_offset.to_le_bytes());
        out[16..18].copy_from_slice(&self.special_offset.to_le_bytes());
        out[18..20].copy_from_slice(&self.page_layout_version.to_le_bytes());
        out[20..24].copy_from_slice(&self.prune_transaction_id.to_le_bytes());
    }

    /// LSN in the `hi/lo` hexadecimal form database tools print.
    pub fn lsn_display(&self) -> String {
        format!(
            "{:X}/{:X}",
            self.log_sequence_number >> 32,
            self.log_sequence_number & 0xFFFF_FFFF
        )
    }
}

impl fmt::Display for PageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lsn={} checksum={:#06x} flags={:#06x} lower={} upper={} special={} layout_version={:#06x} prune_xid={}",
            self.lsn_display(),
            self.checksum,
            self.flags,
            self.lower_offset,
            self.upper_offset,
            self.special_offset,
            self.page_layout_version,
            self.prune_transaction_id
        )
    }
}

/// Decodes a page header from a raw page buffer.
///
/// - Empty buffer: the page does not exist, returns the all-zero header.
/// - Any length other than `PAGE_SIZE`: `DecodeError::InvalidSize`.
/// - Otherwise the first 24 bytes are parsed.
pub fn decode(buffer: &[u8]) -> DecodeResult<PageHeader> {
    if buffer.is_empty() {
        return Ok(PageHeader::empty());
    }

    if buffer.len() != PAGE_SIZE {
        return Err(DecodeError::InvalidSize { len: buffer.len() });
    }

    Ok(PageHeader::read_from(buffer))
}
