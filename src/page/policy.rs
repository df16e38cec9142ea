//! Header predicates used by the replace decision
//!
//! All predicates are pure and total.

use super::header::PageHeader;
use super::{PAGE_LAYOUT_VERSION, PAGE_SIZE};

/// Packed value a healthy page carries in `page_layout_version`.
const EXPECTED_LAYOUT: u16 = PAGE_SIZE as u16 | PAGE_LAYOUT_VERSION;

/// True iff every header field is zero (the page slot was never written).
pub fn is_empty(header: &PageHeader) -> bool {
    *header == PageHeader::empty()
}

/// True iff the packed size/version field matches this page format.
///
/// Structural check only. The page checksum is not verified.
pub fn is_valid(header: &PageHeader) -> bool {
    header.page_layout_version == EXPECTED_LAYOUT
}

/// Field-wise equality of two headers.
pub fn are_equivalent(a: &PageHeader, b: &PageHeader) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_header() -> PageHeader {
        PageHeader {
            log_sequence_number: 42,
            lower_offset: 28,
            upper_offset: 8160,
            special_offset: 8192,
            page_layout_version: 8196,
            ..PageHeader::empty()
        }
    }

    #[test]
    fn test_expected_layout_constant() {
        assert_eq!(EXPECTED_LAYOUT, 8196);
    }

    #[test]
    fn test_empty_header_is_empty() {
        assert!(is_empty(&PageHeader::empty()));
    }

    #[test]
    fn test_any_nonzero_field_is_not_empty() {
        let variants = [
            PageHeader {
                log_sequence_number: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                checksum: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                flags: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                lower_offset: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                upper_offset: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                special_offset: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                page_layout_version: 1,
                ..PageHeader::empty()
            },
            PageHeader {
                prune_transaction_id: 1,
                ..PageHeader::empty()
            },
        ];
        for header in variants {
            assert!(!is_empty(&header), "{:?} must not be empty", header);
        }
    }

    #[test]
    fn test_validity_uses_packed_field() {
        assert!(is_valid(&valid_header()));

        for layout in [0u16, 1, 4, 8192, 8195, 8197, 4100, 16388] {
            let header = PageHeader {
                page_layout_version: layout,
                ..valid_header()
            };
            assert!(!is_valid(&header), "layout {} must be invalid", layout);
        }
    }

    #[test]
    fn test_validity_ignores_other_fields() {
        let header = PageHeader {
            page_layout_version: 8196,
            ..PageHeader::empty()
        };
        assert!(is_valid(&header));
    }

    #[test]
    fn test_equivalence() {
        let a = valid_header();
        assert!(are_equivalent(&a, &a));

        let b = PageHeader {
            prune_transaction_id: 7,
            ..a
        };
        assert!(!are_equivalent(&a, &b));
        assert!(!are_equivalent(&b, &a));
    }
}
