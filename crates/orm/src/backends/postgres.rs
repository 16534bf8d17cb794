//! PostgreSQL backend
//!
//! Sessions are sqlx transactions checked out of a `PgPool`. Queries are
//! compiled with the PostgreSQL dialect and bound positionally.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, Transaction, TypeInfo, ValueRef};
use tracing::debug;

use super::core::{DatabaseRow, DatabaseValue, SqlDialect};
use crate::error::{OrmError, OrmResult};
use crate::query::SelectQuery;
use crate::session::{Session, SessionProvider};
use rowset_core::DatabaseSettings;

/// Pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct DatabasePoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: Option<u64>,
    pub max_lifetime_seconds: Option<u64>,
    pub test_before_acquire: bool,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

/// Hands out [`PostgresSession`]s from a connection pool
#[derive(Debug, Clone)]
pub struct PostgresSessionProvider {
    pool: PgPool,
}

impl PostgresSessionProvider {
    /// Connect a pool to the database named by `settings`
    pub async fn connect(settings: &DatabaseSettings, config: DatabasePoolConfig) -> OrmResult<Self> {
        validate_driver(&settings.driver)?;

        let mut options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .test_before_acquire(config.test_before_acquire);

        if let Some(idle_timeout) = config.idle_timeout_seconds {
            options = options.idle_timeout(Duration::from_secs(idle_timeout));
        }

        if let Some(max_lifetime) = config.max_lifetime_seconds {
            options = options.max_lifetime(Duration::from_secs(max_lifetime));
        }

        let pool = options
            .connect(&settings.uri())
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to create PostgreSQL pool: {}", e)))?;

        debug!(
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            "connected PostgreSQL pool"
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SessionProvider for PostgresSessionProvider {
    type Session = PostgresSession;

    async fn open(&self) -> OrmResult<PostgresSession> {
        let tx = self.pool.begin().await?;
        Ok(PostgresSession { tx: Some(tx) })
    }
}

fn validate_driver(driver: &str) -> OrmResult<()> {
    match driver {
        "postgres" | "postgresql" => Ok(()),
        other => Err(OrmError::Configuration(format!(
            "Unsupported database driver '{}', expected postgres or postgresql",
            other
        ))),
    }
}

/// One database transaction; dropping it unfinished rolls it back
pub struct PostgresSession {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresSession {
    fn transaction(&mut self) -> OrmResult<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| OrmError::Transaction("Transaction already completed".to_string()))
    }

    fn finish(&mut self) -> OrmResult<Transaction<'static, Postgres>> {
        self.tx
            .take()
            .ok_or_else(|| OrmError::Transaction("Transaction already completed".to_string()))
    }

    async fn fetch(&mut self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<PgRow>> {
        debug!(sql, params = params.len(), "executing statement");

        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_database_value(query, param)?;
        }

        let tx = self.transaction()?;
        Ok(query.fetch_all(&mut **tx).await?)
    }

    async fn fetch_one(&mut self, sql: &str, params: &[DatabaseValue]) -> OrmResult<PgRow> {
        self.fetch(sql, params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OrmError::Query(format!("Statement returned no rows: {}", sql)))
    }
}

#[async_trait]
impl Session for PostgresSession {
    async fn fetch_all(&mut self, query: &SelectQuery) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        let (sql, params) = query.to_sql_with_params(SqlDialect::PostgreSQL);
        let rows = self.fetch(&sql, &params).await?;
        Ok(rows
            .into_iter()
            .map(|row| Box::new(PostgresRow::new(row)) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn count(&mut self, query: &SelectQuery) -> OrmResult<u64> {
        let (sql, params) = query.to_count_sql_with_params(SqlDialect::PostgreSQL);
        let row = self.fetch_one(&sql, &params).await?;
        let count: i64 = row.try_get(0)?;
        u64::try_from(count).map_err(|_| OrmError::Query(format!("Negative row count {}", count)))
    }

    async fn exists(&mut self, query: &SelectQuery) -> OrmResult<bool> {
        let (sql, params) = query.to_exists_sql_with_params(SqlDialect::PostgreSQL);
        let row = self.fetch_one(&sql, &params).await?;
        Ok(row.try_get(0)?)
    }

    async fn commit(&mut self) -> OrmResult<()> {
        self.finish()?
            .commit()
            .await
            .map_err(|e| OrmError::Transaction(format!("Transaction commit failed: {}", e)))
    }

    async fn rollback(&mut self) -> OrmResult<()> {
        self.finish()?
            .rollback()
            .await
            .map_err(|e| OrmError::Transaction(format!("Transaction rollback failed: {}", e)))
    }
}

/// PostgreSQL row
pub struct PostgresRow {
    row: PgRow,
}

impl PostgresRow {
    pub fn new(row: PgRow) -> Self {
        Self { row }
    }
}

impl DatabaseRow for PostgresRow {
    fn get_by_index(&self, index: usize) -> OrmResult<DatabaseValue> {
        postgres_value_to_database_value(&self.row, index)
    }

    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        let index = self
            .row
            .columns()
            .iter()
            .position(|col| col.name() == name)
            .ok_or_else(|| OrmError::Query(format!("Column '{}' not found", name)))?;

        postgres_value_to_database_value(&self.row, index)
    }

    fn column_count(&self) -> usize {
        self.row.len()
    }

    fn column_names(&self) -> Vec<String> {
        self.row.columns().iter().map(|col| col.name().to_string()).collect()
    }

    fn to_json(&self) -> OrmResult<JsonValue> {
        let mut map = serde_json::Map::new();

        for (i, column) in self.row.columns().iter().enumerate() {
            map.insert(column.name().to_string(), self.get_by_index(i)?.to_json());
        }

        Ok(JsonValue::Object(map))
    }
}

/// Bind a DatabaseValue to a sqlx query
fn bind_database_value<'a>(
    query: Query<'a, Postgres, PgArguments>,
    value: &DatabaseValue,
) -> OrmResult<Query<'a, Postgres, PgArguments>> {
    match value {
        DatabaseValue::Null => Ok(query.bind(Option::<String>::None)),
        DatabaseValue::Bool(b) => Ok(query.bind(*b)),
        DatabaseValue::Int32(i) => Ok(query.bind(*i)),
        DatabaseValue::Int64(i) => Ok(query.bind(*i)),
        DatabaseValue::Float32(f) => Ok(query.bind(*f)),
        DatabaseValue::Float64(f) => Ok(query.bind(*f)),
        DatabaseValue::String(s) => Ok(query.bind(s.clone())),
        DatabaseValue::Bytes(b) => Ok(query.bind(b.clone())),
        DatabaseValue::Uuid(u) => Ok(query.bind(*u)),
        DatabaseValue::DateTime(dt) => Ok(query.bind(*dt)),
        DatabaseValue::Date(d) => Ok(query.bind(*d)),
        DatabaseValue::Time(t) => Ok(query.bind(*t)),
        DatabaseValue::Json(j) => Ok(query.bind(j.clone())),
        // IN lists are expanded into one placeholder per element
        DatabaseValue::Array(_) => Err(OrmError::Query(
            "Array values cannot be bound as a single parameter".to_string(),
        )),
    }
}

/// Convert a PostgreSQL column value to DatabaseValue
fn postgres_value_to_database_value(row: &PgRow, index: usize) -> OrmResult<DatabaseValue> {
    let column = row
        .columns()
        .get(index)
        .ok_or_else(|| OrmError::Query(format!("Column index {} out of range", index)))?;
    let type_name = column.type_info().name();

    if row.try_get_raw(index)?.is_null() {
        return Ok(DatabaseValue::Null);
    }

    let read = |e: sqlx::Error| {
        OrmError::Query(format!(
            "Failed to read column '{}' as {}: {}",
            column.name(),
            type_name,
            e
        ))
    };

    let value = match type_name {
        "BOOL" => DatabaseValue::Bool(row.try_get(index).map_err(read)?),
        "INT2" => DatabaseValue::Int32(row.try_get::<i16, _>(index).map_err(read)? as i32),
        "INT4" => DatabaseValue::Int32(row.try_get(index).map_err(read)?),
        "INT8" => DatabaseValue::Int64(row.try_get(index).map_err(read)?),
        "FLOAT4" => DatabaseValue::Float32(row.try_get(index).map_err(read)?),
        "FLOAT8" => DatabaseValue::Float64(row.try_get(index).map_err(read)?),
        "BYTEA" => DatabaseValue::Bytes(row.try_get(index).map_err(read)?),
        "UUID" => DatabaseValue::Uuid(row.try_get(index).map_err(read)?),
        "TIMESTAMPTZ" => DatabaseValue::DateTime(row.try_get(index).map_err(read)?),
        "TIMESTAMP" => {
            let naive: chrono::NaiveDateTime = row.try_get(index).map_err(read)?;
            DatabaseValue::DateTime(chrono::DateTime::from_naive_utc_and_offset(naive, chrono::Utc))
        }
        "DATE" => DatabaseValue::Date(row.try_get(index).map_err(read)?),
        "TIME" => DatabaseValue::Time(row.try_get(index).map_err(read)?),
        "JSON" | "JSONB" => DatabaseValue::Json(row.try_get(index).map_err(read)?),
        _ => DatabaseValue::String(row.try_get(index).map_err(read)?),
    };

    Ok(value)
}
