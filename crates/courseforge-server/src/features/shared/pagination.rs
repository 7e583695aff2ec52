//! Shared pagination utilities
//!
//! # Examples
//!
//! ```rust,ignore
//! use courseforge_server::features::shared::pagination::{PaginationMetadata, PaginationParams};
//!
//! let params = PaginationParams::new(Some(2), Some(10));
//! params.validate()?;
//! let offset = params.offset().ok_or("Page is out of range")?;
//! let (courses, total) = repos.courses.list_courses(owner, params.per_page(), offset).await?;
//! let meta = PaginationMetadata::from_params(&params, total);
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// `?page=&per_page=` query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// 1-indexed page, defaults to 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Defaults to [`DEFAULT_PER_PAGE`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Rows to skip, or `None` when the page is too far out to address
    pub fn offset(&self) -> Option<i64> {
        (self.page() - 1).checked_mul(self.per_page())
    }

    /// Reject explicit out-of-range values instead of silently clamping them
    pub fn validate(&self) -> Result<(), &'static str> {
        if matches!(self.page, Some(page) if page < 1) {
            return Err("Page must be greater than 0");
        }
        if matches!(self.per_page, Some(n) if !(1..=MAX_PER_PAGE).contains(&n)) {
            return Err("Per page must be between 1 and 100");
        }
        if self.offset().is_none() {
            return Err("Page is out of range");
        }
        Ok(())
    }
}

/// Pagination block placed in the response `meta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}
