//! Page/limit parsing and page metadata.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Validated page window. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Result<Self, QueryError> {
        if page < 1 || limit < 1 {
            return Err(QueryError::InvalidPagination);
        }
        Ok(Self {
            page: page as u64,
            limit: limit as u64,
        })
    }

    /// Parse raw `page`/`limit` values.
    ///
    /// Only the leading integer counts (`"3abc"` is 3); missing, blank,
    /// non-numeric or zero values fall back to the defaults. Negative values
    /// are rejected.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
    ) -> Result<Self, QueryError> {
        let page = page.and_then(leading_int).filter(|&n| n != 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(leading_int)
            .filter(|&n| n != 0)
            .unwrap_or(default_limit);
        Self::new(page, limit)
    }

    /// Same as [`Pagination::from_params`], reading the last `page` and
    /// `limit` entries from raw query pairs.
    pub fn from_query(params: &[(String, String)], default_limit: i64) -> Result<Self, QueryError> {
        let last = |key: &str| {
            params
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        Self::from_params(last("page"), last("limit"), default_limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of matching documents to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn build_page<T>(&self, total_items: u64, items: Vec<T>) -> PageResult<T> {
        PageResult {
            total_items,
            items,
            current_page: self.page,
            total_pages: total_items.div_ceil(self.limit),
            items_per_page: self.limit,
            has_next_page: self.page.saturating_mul(self.limit) < total_items,
            has_previous_page: self.page > 1,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u64,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

/// One page of results plus its position within the whole match set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub total_items: u64,
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            total_items: self.total_items,
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            items_per_page: self.items_per_page,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

/// Leading optionally-signed decimal integer, ignoring surrounding whitespace.
fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
