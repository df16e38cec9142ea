//! Segment addressing
//!
//! A global page number maps to a segment file and a page offset inside that
//! segment. The first segment carries no suffix; segment `n > 0` is the
//! relation path followed by `.n`.

use super::SEGMENT_CAPACITY;

/// Location of one page on disk, relative to the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    /// Segment number (0 for the base file)
    pub segment: u64,
    /// Segment file path relative to the data root
    pub segment_file: String,
    /// Page offset within the segment file (in pages, not bytes)
    pub offset_in_segment: u64,
}

impl PageAddress {
    /// Computes the address of `page_number` within `relation`.
    pub fn locate(relation: &str, page_number: u64) -> Self {
        let segment = page_number / SEGMENT_CAPACITY;
        let segment_file = if segment == 0 {
            relation.to_string()
        } else {
            format!("{}.{}", relation, segment)
        };

        Self {
            segment,
            segment_file,
            offset_in_segment: page_number % SEGMENT_CAPACITY,
        }
    }
}
