// src/store/meta.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Server-driven pagination state. `page` is 1-based; `total` is the
/// server-reported row count for the current filter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            total: 0,
        }
    }
}

/// Partial pagination update. Each field present in the patch replaces the
/// corresponding field; absent fields are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
}

impl Pagination {
    pub fn apply(&mut self, patch: PaginationPatch) {
        if let Some(page) = patch.page {
            self.page = page;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
    }

    /// Jump back to the first page, keeping limit and total.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }
}

/// Optional inclusive date bounds forwarded to the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Status-style filter: either everything, or entries matching one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T> Filter<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_patch_retains_absent_fields() {
        let mut pagination = Pagination::default();
        pagination.apply(PaginationPatch {
            page: Some(3),
            limit: None,
            total: Some(42),
        });

        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(pagination.total, 42);
    }

    #[test]
    fn filter_defaults_to_all() {
        let filter: Filter<u8> = Filter::default();
        assert_eq!(filter.as_option(), None);
        assert_eq!(Filter::Only(7u8).as_option(), Some(&7));
    }
}
