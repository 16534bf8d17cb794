//! List query parameters and the page response body

use axum::Json;
use rowset_core::Settings;
use rowset_orm::{Page, PageRequest};
use serde::{Deserialize, Serialize};

/// `?offset=&limit=` query parameters of a list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Fill missing values from the configured defaults.
    ///
    /// Negative values pass through unchanged and are rejected by
    /// pagination itself.
    pub fn resolve(&self, settings: &Settings) -> PageRequest {
        PageRequest::new(
            self.offset.unwrap_or(settings.default_offset),
            self.limit.unwrap_or(settings.default_limit),
        )
    }
}

/// Serialized as `{total_count, count, limit, offset, results}`
pub type PageResponse<M> = Json<Page<M>>;
