//! # rowset-orm: paginated lists and lookups over a database session
//!
//! Generic, model-parametrized read operations on top of a [`Session`]:
//!
//! - [`paginate`] returns one window of rows together with the total count
//!   of rows matching the same filters.
//! - [`exists`] tests whether any row matches.
//! - [`get_or_fail`] returns the single matching row or a typed
//!   [`OrmError::NotFound`].
//! - [`session_scope`] runs a unit of work inside a session that is
//!   committed on success, rolled back on failure and always released.
//!
//! Queries are plain values built with [`QueryBuilder`]; nothing touches the
//! database until an execution method receives a session. Sessions come
//! from a [`SessionProvider`], either the sqlx-backed
//! [`PostgresSessionProvider`] or the in-process [`MemoryStore`].

pub mod backends;
pub mod error;
pub mod lookup;
pub mod model;
pub mod paginator;
pub mod query;
pub mod session;
pub mod transaction;

pub use backends::{
    DatabasePoolConfig, DatabaseRow, DatabaseValue, MemoryStore, PostgresSessionProvider,
    SqlDialect,
};
pub use error::{OrmError, OrmResult};
pub use lookup::{exists, get_or_fail};
pub use model::Model;
pub use paginator::{paginate, paginate_request, Page, PageRequest};
pub use query::{Filter, OrderBy, OrderDirection, QueryBuilder, QueryOperator, SelectQuery};
pub use session::{Session, SessionProvider};
pub use transaction::{session_scope, ScopeFuture};
