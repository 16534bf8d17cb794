//! Query Builder - the immutable select query and its typed wrapper

use std::fmt;
use std::marker::PhantomData;

use super::types::*;
use crate::model::Model;

/// Untyped select over one table: the value sessions execute.
///
/// Filters are AND-combined in insertion order; ordering clauses apply in
/// insertion order; offset and limit bound the window.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub(crate) table: String,
    pub(crate) filters: Vec<Filter>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) offset: Option<u64>,
    pub(crate) limit: Option<u64>,
}

impl SelectQuery {
    /// Unrestricted query over `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// True when offset or limit narrows the result set
    pub fn is_bounded(&self) -> bool {
        self.offset.is_some() || self.limit.is_some()
    }

    /// Human-readable rendering of the filters, for diagnostics
    pub fn criteria(&self) -> String {
        if self.filters.is_empty() {
            return "(no criteria)".to_string();
        }
        self.filters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Typed query over the rows of model `M`.
///
/// Every builder method consumes `self` and returns the derived query, so a
/// clone taken beforehand stays untouched.
pub struct QueryBuilder<M> {
    pub(crate) query: SelectQuery,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for QueryBuilder<M> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for QueryBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("query", &self.query)
            .finish()
    }
}

impl<M: Model> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> QueryBuilder<M> {
    /// Unrestricted "all rows" query over `M`'s table
    pub fn new() -> Self {
        Self::from_select(SelectQuery::new(M::table_name()))
    }

    /// Unbounded query over `M` restricted to all `filters`, kept in order.
    /// Nothing executes until a terminal method is awaited.
    pub fn build(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::new().filters(filters)
    }
}

impl<M> QueryBuilder<M> {
    pub fn from_select(query: SelectQuery) -> Self {
        Self {
            query,
            _model: PhantomData,
        }
    }

    pub fn as_select(&self) -> &SelectQuery {
        &self.query
    }

    pub fn into_select(self) -> SelectQuery {
        self.query
    }

    pub fn criteria(&self) -> String {
        self.query.criteria()
    }
}
