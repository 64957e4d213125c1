//! Offset/limit pagination shared by every list endpoint.
//!
//! [`Paginator`] turns the raw `offset` and `limit` query parameters into
//! bounded values, and [`Page`] is the envelope returned to clients.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{Book, Review},
};

/// Raw pagination query parameters.
///
/// Values are kept as strings so malformed input is reported with the
/// pagination error kinds instead of a generic query rejection.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Number of items to skip (default: 0)
    pub offset: Option<String>,
    /// Maximum number of items to return
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn new(offset: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            offset: offset.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    /// Build from decoded query pairs. The first `offset` and `limit` win and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "offset" if query.offset.is_none() => query.offset = Some(value),
                "limit" if query.limit.is_none() => query.limit = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Resolves and bounds-checks pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub default_limit: usize,
    pub default_offset: usize,
    pub default_maximum_limit: usize,
}

impl Paginator {
    pub fn new(default_limit: usize, default_offset: usize, default_maximum_limit: usize) -> Self {
        Self {
            default_limit,
            default_offset,
            default_maximum_limit,
        }
    }

    /// Read `offset` and `limit` from the query, falling back to the defaults.
    ///
    /// A resolved limit above the configured maximum is rejected even when it
    /// comes from the defaults.
    pub fn get_pagination_values(&self, query: &PaginationQuery) -> AppResult<(usize, usize)> {
        let offset = match present(&query.offset) {
            Some(raw) => parse_non_negative(raw).ok_or(AppError::InvalidOffsetParameter)?,
            None => self.default_offset,
        };

        let limit = match present(&query.limit) {
            Some(raw) => parse_non_negative(raw).ok_or(AppError::InvalidLimitParameter)?,
            None => self.default_limit,
        };

        if limit > self.default_maximum_limit {
            return Err(AppError::LimitExceedsMaximum {
                max: self.default_maximum_limit,
            });
        }

        Ok((offset, limit))
    }
}

impl From<&PaginationConfig> for Paginator {
    fn from(config: &PaginationConfig) -> Self {
        Self::new(
            config.default_limit,
            config.default_offset,
            config.default_maximum_limit,
        )
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::from(&PaginationConfig::default())
    }
}

/// An empty parameter (`?offset=`) counts as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_non_negative(raw: &str) -> Option<usize> {
    let value: i64 = raw.parse().ok()?;
    usize::try_from(value).ok()
}

/// Page envelope returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(BookPage = Page<Book>, ReviewPage = Page<Review>)]
pub struct Page<T> {
    /// Items in this page
    pub items: Vec<T>,
    /// Number of items in this page
    pub count: usize,
    /// Offset used for this page
    pub offset: usize,
    /// Limit used for this page
    pub limit: usize,
    /// Total matching items across all pages
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, offset: usize, limit: usize, total_count: usize) -> Self {
        Self {
            count: items.len(),
            items,
            offset,
            limit,
            total_count,
        }
    }
}

/// Take the `offset`/`limit` window out of an already ordered list
pub fn slice_window<T: Clone>(items: &[T], offset: usize, limit: usize) -> Vec<T> {
    items.iter().skip(offset).take(limit).cloned().collect()
}
