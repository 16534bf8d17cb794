//! Query Builder ORDER BY operations

use super::builder::QueryBuilder;
use super::types::*;

impl<M> QueryBuilder<M> {
    /// Append one ordering clause
    pub fn order_by(mut self, clause: OrderBy) -> Self {
        self.query.order_by.push(clause);
        self
    }

    /// Append ordering clauses; earlier ones are the primary sort keys
    pub fn order_by_all(mut self, clauses: impl IntoIterator<Item = OrderBy>) -> Self {
        self.query.order_by.extend(clauses);
        self
    }

    /// Add ORDER BY clause (ascending)
    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(OrderBy::asc(column))
    }

    /// Add ORDER BY clause (descending)
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(OrderBy::desc(column))
    }
}
