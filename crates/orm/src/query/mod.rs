//! Query Builder Module - immutable, lazily executed select queries

pub mod builder;
pub mod execution;
pub mod ordering;
pub mod pagination;
pub mod sql_generation;
pub mod types;
pub mod where_clause;

pub use builder::{QueryBuilder, SelectQuery};
pub use types::{Filter, OrderBy, OrderDirection, QueryOperator};
