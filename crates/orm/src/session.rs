//! Session abstraction
//!
//! A session is one exclusive unit of work against the database: it executes
//! select queries and ends with a commit or a rollback. Opening, pooling and
//! releasing sessions belongs to a [`SessionProvider`] and to the caller.

use async_trait::async_trait;

use crate::backends::DatabaseRow;
use crate::error::OrmResult;
use crate::query::SelectQuery;

/// Executes queries within one transaction
#[async_trait]
pub trait Session: Send {
    /// Rows the query selects, in the query's order
    async fn fetch_all(&mut self, query: &SelectQuery) -> OrmResult<Vec<Box<dyn DatabaseRow>>>;

    /// Number of rows the query would return
    async fn count(&mut self, query: &SelectQuery) -> OrmResult<u64>;

    /// Whether the query selects at least one row, without materializing rows
    async fn exists(&mut self, query: &SelectQuery) -> OrmResult<bool>;

    async fn commit(&mut self) -> OrmResult<()>;

    async fn rollback(&mut self) -> OrmResult<()>;
}

/// Source of fresh sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: Session;

    async fn open(&self) -> OrmResult<Self::Session>;
}
