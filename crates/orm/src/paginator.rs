//! Paginated list queries
//!
//! A page is computed from two statements over the same filtered query: a
//! count that ignores ordering and the window, and a bounded select derived
//! from a clone of the unbounded query.

use serde::Serialize;
use tracing::debug;

use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::query::{Filter, OrderBy, QueryBuilder};
use crate::session::Session;

/// One window of a filtered result set plus its counts.
///
/// `count == results.len()`, `count <= limit` and `count <= total_count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<M> {
    /// Rows matching the filters, ignoring offset and limit
    pub total_count: u64,
    /// Rows returned in this page
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
    pub results: Vec<M>,
}

impl<M> Page<M> {
    /// Number of pages of `limit` rows needed to cover `total_count`
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total_count.div_ceil(self.limit)
        }
    }

    /// Whether rows remain past this page
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.count) < self.total_count
    }

    pub fn map<U>(self, f: impl FnMut(M) -> U) -> Page<U> {
        Page {
            total_count: self.total_count,
            count: self.count,
            limit: self.limit,
            offset: self.offset,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Inputs of a paginated list query, grouped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
    pub order_by: Vec<OrderBy>,
    pub filters: Vec<Filter>,
}

impl PageRequest {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    pub fn order_by(mut self, clause: OrderBy) -> Self {
        self.order_by.push(clause);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

fn non_negative(argument: &'static str, value: i64) -> OrmResult<u64> {
    u64::try_from(value).map_err(|_| OrmError::InvalidArgument { argument, value })
}

/// Fetch one page of `M` rows matching `filters`.
///
/// Negative `offset` or `limit` fails with [`OrmError::InvalidArgument`]
/// before the session is touched. A `limit` of 0 yields an empty page; an
/// offset past the end yields an empty page. Without `order_by` the row
/// order is whatever the backend returns.
pub async fn paginate<M, S>(
    session: &mut S,
    offset: i64,
    limit: i64,
    order_by: Vec<OrderBy>,
    filters: Vec<Filter>,
) -> OrmResult<Page<M>>
where
    M: Model,
    S: Session + ?Sized,
{
    let offset = non_negative("offset", offset)?;
    let limit = non_negative("limit", limit)?;

    let list_query = QueryBuilder::<M>::build(filters);
    let total_count = list_query.count(session).await?;

    let results = if limit == 0 {
        Vec::new()
    } else {
        list_query
            .clone()
            .order_by_all(order_by)
            .offset(offset)
            .limit(limit)
            .all(session)
            .await?
    };

    let count = results.len() as u64;
    debug!(
        table = M::table_name(),
        total_count, count, offset, limit, "paginated list query"
    );

    Ok(Page {
        total_count,
        count,
        limit,
        offset,
        results,
    })
}

/// [`paginate`] taking its inputs as a [`PageRequest`]
pub async fn paginate_request<M, S>(session: &mut S, request: PageRequest) -> OrmResult<Page<M>>
where
    M: Model,
    S: Session + ?Sized,
{
    paginate(
        session,
        request.offset,
        request.limit,
        request.order_by,
        request.filters,
    )
    .await
}
