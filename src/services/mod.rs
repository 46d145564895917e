pub mod dashboard;
pub mod history;
pub mod session;

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("undecodable stored value: {0}")]
    Decode(String),
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl ServiceError {
    /// Maps a foreign-key rejection from the store onto `InvalidReference`;
    /// every other failure stays a store failure.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        let rejected = err
            .as_database_error()
            .map(|db_err| db_err.is_foreign_key_violation())
            .unwrap_or(false);
        if rejected {
            Self::InvalidReference(what.to_string())
        } else {
            Self::Sql(err)
        }
    }
}

/// 1-indexed page window. Construct with [`PageRequest::new`] so both sides are ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

/// One window of rows plus the unwindowed total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            current_page: self.request.page(),
            total_pages: total_pages(self.total, self.request.per_page()),
            total_items: self.total,
            items_per_page: self.request.per_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// `ceil(total / per_page)`, zero for an empty collection.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    let per_page = per_page.max(1);
    total / per_page + i64::from(total % per_page != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(7, 1), 7);
    }

    #[test]
    fn total_pages_with_huge_page_size() {
        assert_eq!(total_pages(2, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn page_request_clamps_to_one() {
        let req = PageRequest::new(0, -5);
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
        assert_eq!(PageRequest::new(i64::MAX, i64::MAX).offset(), i64::MAX);
    }
}
