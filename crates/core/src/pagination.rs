//! Page-number pagination shared by all list endpoints.
//!
//! Parsing is lenient: a missing or malformed `page` / `page_size` falls
//! back to the default instead of rejecting the request.

use std::collections::HashMap;

use serde::Serialize;

pub const PARAM_PAGE: &str = "page";
pub const PARAM_PAGE_SIZE: &str = "page_size";

/// Default page size for knack and knack idea listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for a client-supplied `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fixed page size for category listings.
pub const CATEGORY_PAGE_SIZE: i64 = 100;

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// Read `page` and `page_size` from request parameters.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page_size = params
            .get(PARAM_PAGE_SIZE)
            .and_then(|v| v.trim().parse::<i64>().ok());
        Self {
            page: parse_page(params),
            page_size: clamp_page_size(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Read `page` only; the page size is fixed.
    pub fn fixed(params: &HashMap<String, String>, page_size: i64) -> Self {
        Self {
            page: parse_page(params),
            page_size,
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Clamp a user-provided page size to valid bounds.
pub fn clamp_page_size(page_size: Option<i64>, default: i64, max: i64) -> i64 {
    page_size.unwrap_or(default).clamp(1, max)
}

fn parse_page(params: &HashMap<String, String>) -> i64 {
    params
        .get(PARAM_PAGE)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1)
}
