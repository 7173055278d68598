use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;

// ASCII digits only: `\d` would also match other Unicode digits.
static SINGLE_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)$").unwrap());
static PAGE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)-([0-9]+)$").unwrap());

/// Why a page selection was rejected. Only the first failing segment is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageSelectionError {
    #[error("Unknown page count")]
    UnknownPageCount,

    #[error("Enter at least one page number or range")]
    EmptySelection,

    #[error("Page {page} is out of bounds")]
    PageOutOfBounds { page: u64 },

    #[error("Range {segment} is invalid (start greater than end)")]
    InvalidRangeOrder { segment: String },

    #[error("Range {segment} is out of bounds")]
    RangeOutOfBounds { segment: String },

    #[error("\"{segment}\" is not a valid page or range")]
    MalformedSegment { segment: String },

    #[error("No valid pages selected")]
    NoValidPages,
}

/// Parse a selection like "1-3,5,7" into sorted, deduplicated 0-based page indices.
///
/// Page numbers in the input are 1-based. An empty (or whitespace-only) input
/// and the wildcard `*` select every page.
pub fn parse_page_selection(input: &str, total_pages: u32) -> Result<Vec<u32>, PageSelectionError> {
    if total_pages == 0 {
        return Err(PageSelectionError::UnknownPageCount);
    }

    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok((0..total_pages).collect());
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let segments: Vec<&str> = compact.split(',').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(PageSelectionError::EmptySelection);
    }

    let total = u64::from(total_pages);
    let mut selected = BTreeSet::new();

    for segment in segments {
        if let Some(caps) = SINGLE_PAGE.captures(segment) {
            let page = parse_number(&caps[1]);
            if page < 1 || page > total {
                return Err(PageSelectionError::PageOutOfBounds { page });
            }
            selected.insert(page - 1);
        } else if let Some(caps) = PAGE_RANGE.captures(segment) {
            let start = parse_number(&caps[1]);
            let end = parse_number(&caps[2]);
            if start > end {
                return Err(PageSelectionError::InvalidRangeOrder {
                    segment: segment.to_string(),
                });
            }
            if start < 1 || end > total {
                return Err(PageSelectionError::RangeOutOfBounds {
                    segment: segment.to_string(),
                });
            }
            selected.extend((start..=end).map(|page| page - 1));
        } else {
            return Err(PageSelectionError::MalformedSegment {
                segment: segment.to_string(),
            });
        }
    }

    if selected.is_empty() {
        return Err(PageSelectionError::NoValidPages);
    }

    // Every index is below `total_pages`, so it fits in a u32.
    Ok(selected.into_iter().map(|page| page as u32).collect())
}

// ASCII digits only (guaranteed by the regexes); overflow saturates so that huge
// numbers fail the bounds checks instead of looking malformed.
fn parse_number(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

/// Parse `;`-separated selection groups, e.g. "1-3;4-6;7".
///
/// Each group is validated with [`parse_page_selection`]. A blank input yields
/// one group per page; blank groups between separators are skipped.
pub fn parse_page_groups(input: &str, total_pages: u32) -> Result<Vec<Vec<u32>>, PageSelectionError> {
    if total_pages == 0 {
        return Err(PageSelectionError::UnknownPageCount);
    }

    let groups: Vec<&str> = input
        .split(';')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .collect();

    if groups.is_empty() {
        return Ok((0..total_pages).map(|page| vec![page]).collect());
    }

    groups
        .into_iter()
        .map(|group| parse_page_selection(group, total_pages))
        .collect()
}

/// Outcome of a selection in record form: `pages` is empty iff `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSelection {
    pub pages: Vec<u32>,
    pub error: Option<String>,
}

impl PageSelection {
    pub fn evaluate(input: &str, total_pages: u32) -> Self {
        match parse_page_selection(input, total_pages) {
            Ok(pages) => PageSelection { pages, error: None },
            Err(e) => PageSelection {
                pages: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// One-line feedback: the error, or how many pages are selected.
    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("{} page(s) selected", self.pages.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selects_all() {
        assert_eq!(parse_page_selection("", 4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(parse_page_selection("   \t", 4).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_wildcard_selects_all() {
        assert_eq!(parse_page_selection("*", 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(parse_page_selection("  *  ", 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_page_count() {
        for input in ["", "*", "1", "1-3", "abc"] {
            let err = parse_page_selection(input, 0).unwrap_err();
            assert_eq!(err, PageSelectionError::UnknownPageCount);
            assert_eq!(err.to_string(), "Unknown page count");
        }
    }

    #[test]
    fn test_mixed_pages_and_ranges() {
        assert_eq!(
            parse_page_selection("1-3,5,7", 10).unwrap(),
            vec![0, 1, 2, 4, 6]
        );
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(
            parse_page_selection(" 1 - 3 , 5 ", 10).unwrap(),
            vec![0, 1, 2, 4]
        );
    }

    #[test]
    fn test_reverse_range_is_invalid() {
        let err = parse_page_selection("3-1", 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Range 3-1 is invalid (start greater than end)"
        );
    }

    #[test]
    fn test_page_zero_out_of_bounds() {
        let err = parse_page_selection("0", 5).unwrap_err();
        assert_eq!(err, PageSelectionError::PageOutOfBounds { page: 0 });
        assert_eq!(err.to_string(), "Page 0 is out of bounds");
    }

    #[test]
    fn test_page_past_end_out_of_bounds() {
        let err = parse_page_selection("11", 10).unwrap_err();
        assert_eq!(err.to_string(), "Page 11 is out of bounds");
    }

    #[test]
    fn test_range_out_of_bounds() {
        assert_eq!(
            parse_page_selection("0-2", 5).unwrap_err().to_string(),
            "Range 0-2 is out of bounds"
        );
        assert_eq!(
            parse_page_selection("4-6", 5).unwrap_err().to_string(),
            "Range 4-6 is out of bounds"
        );
    }

    #[test]
    fn test_malformed_segments() {
        assert_eq!(
            parse_page_selection("abc", 5).unwrap_err().to_string(),
            "\"abc\" is not a valid page or range"
        );
        for input in ["-2", "1-", "1-2-3", "2a", "1.5", "+3"] {
            let err = parse_page_selection(input, 5).unwrap_err();
            assert!(
                matches!(err, PageSelectionError::MalformedSegment { .. }),
                "{input}: {err:?}"
            );
        }
    }

    #[test]
    fn test_non_ascii_digits_are_malformed() {
        // Arabic-Indic three, fullwidth three, Devanagari one
        for input in ["\u{0663}", "\u{FF13}", "\u{0967}", "1-\u{0663}"] {
            for total in [5, 2000] {
                let err = parse_page_selection(input, total).unwrap_err();
                assert_eq!(
                    err,
                    PageSelectionError::MalformedSegment {
                        segment: input.to_string()
                    }
                );
            }
        }
    }

    #[test]
    fn test_wildcard_inside_list_is_malformed() {
        assert_eq!(
            parse_page_selection("*,3", 5).unwrap_err(),
            PageSelectionError::MalformedSegment {
                segment: "*".to_string()
            }
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(parse_page_selection("1,1,1-2", 5).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_output_is_sorted() {
        assert_eq!(parse_page_selection("5,1-2", 10).unwrap(), vec![0, 1, 4]);
    }

    #[test]
    fn test_trailing_commas_dropped() {
        assert_eq!(parse_page_selection("2,,3,", 5).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_only_commas_is_empty_selection() {
        let err = parse_page_selection(", ,", 5).unwrap_err();
        assert_eq!(err, PageSelectionError::EmptySelection);
        assert_eq!(err.to_string(), "Enter at least one page number or range");
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse_page_selection("1,abc,99,5-2", 10).unwrap_err();
        assert_eq!(
            err,
            PageSelectionError::MalformedSegment {
                segment: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_order_checked_before_bounds() {
        let err = parse_page_selection("50-20", 10).unwrap_err();
        assert!(matches!(err, PageSelectionError::InvalidRangeOrder { .. }));
    }

    #[test]
    fn test_huge_numbers_are_out_of_bounds() {
        let err = parse_page_selection("99999999999999999999999", 10).unwrap_err();
        assert!(matches!(err, PageSelectionError::PageOutOfBounds { .. }));

        let err = parse_page_selection("1-99999999999999999999999", 10).unwrap_err();
        assert!(matches!(err, PageSelectionError::RangeOutOfBounds { .. }));
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(parse_page_selection("007", 10).unwrap(), vec![6]);
        assert_eq!(
            parse_page_selection("011", 10).unwrap_err().to_string(),
            "Page 11 is out of bounds"
        );
    }

    #[test]
    fn test_single_page_range() {
        assert_eq!(parse_page_selection("4-4", 5).unwrap(), vec![3]);
    }

    #[test]
    fn test_repeat_parse_is_identical() {
        let first = parse_page_selection("9,2-4,2", 12);
        let second = parse_page_selection("9,2-4,2", 12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_groups() {
        assert_eq!(
            parse_page_groups("1-2;3", 5).unwrap(),
            vec![vec![0, 1], vec![2]]
        );
        assert_eq!(
            parse_page_groups(" ", 3).unwrap(),
            vec![vec![0], vec![1], vec![2]]
        );
        assert_eq!(parse_page_groups("1;;2", 3).unwrap(), vec![vec![0], vec![1]]);
        assert!(parse_page_groups("1;9", 3).is_err());
    }

    #[test]
    fn test_selection_record() {
        let ok = PageSelection::evaluate("2-3", 5);
        assert!(ok.is_valid());
        assert_eq!(ok.pages, vec![1, 2]);
        assert_eq!(ok.summary(), "2 page(s) selected");

        let bad = PageSelection::evaluate("7", 5);
        assert!(!bad.is_valid());
        assert!(bad.pages.is_empty());
        assert_eq!(bad.summary(), "Page 7 is out of bounds");
    }

    #[test]
    fn test_selection_record_json() {
        let json = serde_json::to_string(&PageSelection::evaluate("1", 2)).unwrap();
        assert_eq!(json, r#"{"pages":[0],"error":null}"#);
    }
}
