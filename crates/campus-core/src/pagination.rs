//! Pagination for listing endpoints.
//!
//! Clients page with `limit` + `offset`, or `limit` + `page` (1-based, wins
//! over `offset`). Responses carry a [`PaginationMeta`] next to the rows:
//!
//! ```json
//! { "data": [...], "meta": { "total": 35, "limit": 10, "page": 4, "has_more": false } }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// `LIMIT`/`OFFSET` pair ready to bind into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlWindow {
    pub limit: i64,
    pub offset: i64,
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Rows matching the query, all pages included
    pub total: i64,
    /// Page size actually applied
    pub limit: i64,
    /// Rows skipped; set when the client paged by offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Page number; set when the client paged by page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether rows remain after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        let window = params.sql_window();
        Self {
            total,
            limit: window.limit,
            offset: params.page().is_none().then_some(window.offset),
            page: params.page(),
            has_more: window.offset + window.limit < total,
        }
    }
}

/// Paging query parameters. Out of range values are clamped, never rejected.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size, 1 to 100 (default 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Rows to skip (default 0); ignored when `page` is set
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// 1-based page number
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page() {
            Some(page) => (page - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn sql_window(&self) -> SqlWindow {
        SqlWindow {
            limit: self.limit(),
            offset: self.offset(),
        }
    }
}
