//! Database backends
//!
//! `core` holds the row and value types shared by every backend. `postgres`
//! runs sessions on a sqlx pool, `memory` evaluates queries over JSON rows.

pub mod core;
pub mod memory;
pub mod postgres;

pub use self::core::{compare_json, DatabaseRow, DatabaseValue, SqlDialect};
pub use memory::{ExecutedStatement, MemoryRow, MemorySession, MemoryStore, StatementKind};
pub use postgres::{DatabasePoolConfig, PostgresRow, PostgresSession, PostgresSessionProvider};
