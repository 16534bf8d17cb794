//! Query Builder OFFSET / LIMIT operations

use super::builder::QueryBuilder;

impl<M> QueryBuilder<M> {
    /// Add LIMIT clause
    pub fn limit(mut self, count: u64) -> Self {
        self.query.limit = Some(count);
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, count: u64) -> Self {
        self.query.offset = Some(count);
        self
    }

    /// Offset then limit, in that order
    pub fn window(self, offset: u64, limit: u64) -> Self {
        self.offset(offset).limit(limit)
    }
}
