//! Pagination math for the track listing
//!
//! Pages are 1-indexed. Unlike a clamping pager, an out-of-range page is kept
//! as requested so the listing comes back empty with the correct totals.

use crate::{Error, Result};

/// Default number of tracks per page
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: i64 = 500;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub page_size: i64,
    /// Total number of pages, `ceil(total / page_size)`
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

impl Pagination {
    /// True when the page lies beyond the last page
    pub fn is_past_end(&self) -> bool {
        self.page > self.total_pages
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// # Examples
/// ```
/// use yurt_common::pagination::calculate_pagination;
///
/// let p = calculate_pagination(125, 3, 50).unwrap();
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 100);
///
/// let p = calculate_pagination(125, 4, 50).unwrap();
/// assert!(p.is_past_end());
/// ```
pub fn calculate_pagination(total_results: i64, page: i64, page_size: i64) -> Result<Pagination> {
    if page < 1 {
        return Err(Error::InvalidInput(format!(
            "page must be 1 or greater, got {}",
            page
        )));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(Error::InvalidInput(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )));
    }

    let total_pages = (total_results.max(0) + page_size - 1) / page_size;
    let offset = (page - 1).saturating_mul(page_size);

    Ok(Pagination {
        page,
        page_size,
        total_pages,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(125, 2, 50).unwrap();
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 50);
        assert!(!p.is_past_end());
    }

    #[test]
    fn test_pagination_out_of_range_not_clamped() {
        let p = calculate_pagination(125, 4, 50).unwrap();
        assert_eq!(p.page, 4);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 150);
        assert!(p.is_past_end());
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(100, 2, 50).unwrap();
        assert_eq!(p.total_pages, 2);
        assert!(!p.is_past_end());
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, 50).unwrap();
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
        assert!(p.is_past_end());
    }

    #[test]
    fn test_pagination_rejects_bad_input() {
        assert!(matches!(
            calculate_pagination(10, 0, 50),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            calculate_pagination(10, 1, 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            calculate_pagination(10, 1, MAX_PAGE_SIZE + 1),
            Err(Error::InvalidInput(_))
        ));
    }
}
