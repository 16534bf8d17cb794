//! In-memory backend
//!
//! Tables are vectors of JSON objects held in a shared [`MemoryStore`].
//! Sessions evaluate filters, ordering and windows the way a SQL engine
//! would, and record every statement they run (as PostgreSQL text) so
//! callers can assert on what was executed.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use like::Like;
use serde_json::{Map, Value as JsonValue};

use super::core::{compare_json, DatabaseRow, DatabaseValue, SqlDialect};
use crate::error::{OrmError, OrmResult};
use crate::query::{Filter, OrderDirection, QueryOperator, SelectQuery};
use crate::session::{Session, SessionProvider};

/// Kind of statement a memory session executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Count,
    Exists,
}

/// A statement recorded by a memory session
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<DatabaseValue>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Map<String, JsonValue>>>,
    journal: Vec<ExecutedStatement>,
    fail_next: Option<String>,
    opened: usize,
    released: usize,
    commits: usize,
    rollbacks: usize,
}

/// Shared in-memory database
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a row to `table`; the row must be a JSON object
    pub fn insert(&self, table: &str, row: JsonValue) -> OrmResult<()> {
        match row {
            JsonValue::Object(map) => {
                self.state()
                    .tables
                    .entry(table.to_string())
                    .or_default()
                    .push(map);
                Ok(())
            }
            other => Err(OrmError::Serialization(format!(
                "rows must be JSON objects, got {}",
                other
            ))),
        }
    }

    pub fn insert_many(&self, table: &str, rows: impl IntoIterator<Item = JsonValue>) -> OrmResult<()> {
        rows.into_iter().try_for_each(|row| self.insert(table, row))
    }

    /// Open a session directly, outside any scope
    pub fn session(&self) -> MemorySession {
        self.state().opened += 1;
        MemorySession {
            store: self.clone(),
            finished: false,
        }
    }

    /// Make the next statement or commit fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state().fail_next = Some(message.into());
    }

    /// Statements executed so far, oldest first
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.state().journal.clone()
    }

    pub fn clear_executed(&self) {
        self.state().journal.clear();
    }

    pub fn opened(&self) -> usize {
        self.state().opened
    }

    pub fn released(&self) -> usize {
        self.state().released
    }

    pub fn commits(&self) -> usize {
        self.state().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }

    fn run(&self, kind: StatementKind, query: &SelectQuery) -> OrmResult<Vec<Map<String, JsonValue>>> {
        let mut state = self.state();

        let (sql, params) = match kind {
            StatementKind::Select => query.to_sql_with_params(SqlDialect::PostgreSQL),
            StatementKind::Count => query.to_count_sql_with_params(SqlDialect::PostgreSQL),
            StatementKind::Exists => query.to_exists_sql_with_params(SqlDialect::PostgreSQL),
        };
        state.journal.push(ExecutedStatement { kind, sql, params });

        if let Some(message) = state.fail_next.take() {
            return Err(OrmError::Connection(message));
        }

        let mut rows: Vec<Map<String, JsonValue>> = state
            .tables
            .get(query.table())
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters().iter().all(|f| row_matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !query.order_by().is_empty() {
            rows.sort_by(|a, b| {
                query
                    .order_by()
                    .iter()
                    .map(|clause| {
                        let ordering = compare_for_sort(column(a, &clause.column), column(b, &clause.column));
                        match clause.direction {
                            OrderDirection::Asc => ordering,
                            OrderDirection::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let offset = query
            .offset()
            .map_or(0, |offset| usize::try_from(offset).unwrap_or(usize::MAX));
        let limit = query
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl SessionProvider for MemoryStore {
    type Session = MemorySession;

    async fn open(&self) -> OrmResult<MemorySession> {
        Ok(self.session())
    }
}

/// Session over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemorySession {
    store: MemoryStore,
    finished: bool,
}

impl MemorySession {
    fn ensure_active(&self) -> OrmResult<()> {
        if self.finished {
            return Err(OrmError::Transaction("session already finished".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn fetch_all(&mut self, query: &SelectQuery) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        self.ensure_active()?;
        let rows = self.store.run(StatementKind::Select, query)?;
        Ok(rows
            .into_iter()
            .map(|row| Box::new(MemoryRow::new(row)) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn count(&mut self, query: &SelectQuery) -> OrmResult<u64> {
        self.ensure_active()?;
        Ok(self.store.run(StatementKind::Count, query)?.len() as u64)
    }

    async fn exists(&mut self, query: &SelectQuery) -> OrmResult<bool> {
        self.ensure_active()?;
        Ok(!self.store.run(StatementKind::Exists, query)?.is_empty())
    }

    async fn commit(&mut self) -> OrmResult<()> {
        self.ensure_active()?;
        self.finished = true;
        let mut state = self.store.state();
        if let Some(message) = state.fail_next.take() {
            return Err(OrmError::Transaction(message));
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> OrmResult<()> {
        self.ensure_active()?;
        self.finished = true;
        self.store.state().rollbacks += 1;
        Ok(())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.store.state().released += 1;
    }
}

/// Row produced by a memory session
#[derive(Debug, Clone)]
pub struct MemoryRow {
    columns: Vec<String>,
    values: Map<String, JsonValue>,
}

impl MemoryRow {
    pub fn new(values: Map<String, JsonValue>) -> Self {
        Self {
            columns: values.keys().cloned().collect(),
            values,
        }
    }
}

impl DatabaseRow for MemoryRow {
    fn get_by_index(&self, index: usize) -> OrmResult<DatabaseValue> {
        let name = self
            .columns
            .get(index)
            .ok_or_else(|| OrmError::Query(format!("Column index {} out of range", index)))?;
        self.get_by_name(name)
    }

    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        self.values
            .get(name)
            .cloned()
            .map(DatabaseValue::from_json)
            .ok_or_else(|| OrmError::Query(format!("Column '{}' not found", name)))
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn to_json(&self) -> OrmResult<JsonValue> {
        Ok(JsonValue::Object(self.values.clone()))
    }
}

/// Column value, accepting `table.column` qualified names; missing is NULL
fn column<'a>(row: &'a Map<String, JsonValue>, name: &str) -> &'a JsonValue {
    let bare = name.rsplit('.').next().unwrap_or(name);
    row.get(name).or_else(|| row.get(bare)).unwrap_or(&JsonValue::Null)
}

fn json_eq(left: &JsonValue, right: &JsonValue) -> bool {
    match compare_json(left, right) {
        Some(ordering) => ordering == Ordering::Equal,
        None => !left.is_null() && left == right,
    }
}

fn row_matches(row: &Map<String, JsonValue>, filter: &Filter) -> bool {
    let field = column(row, &filter.column);
    let operand = filter
        .value
        .as_ref()
        .map(DatabaseValue::to_json)
        .unwrap_or(JsonValue::Null);

    match filter.operator {
        QueryOperator::IsNull => field.is_null(),
        QueryOperator::IsNotNull => !field.is_null(),
        // Any comparison with NULL is unknown, which filters the row out
        _ if field.is_null() => false,
        QueryOperator::Equal => json_eq(field, &operand),
        QueryOperator::NotEqual => !operand.is_null() && !json_eq(field, &operand),
        QueryOperator::GreaterThan => compare_json(field, &operand) == Some(Ordering::Greater),
        QueryOperator::GreaterThanOrEqual => matches!(
            compare_json(field, &operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        QueryOperator::LessThan => compare_json(field, &operand) == Some(Ordering::Less),
        QueryOperator::LessThanOrEqual => matches!(
            compare_json(field, &operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        QueryOperator::Like | QueryOperator::NotLike => {
            let (Some(text), Some(pattern)) = (field.as_str(), operand.as_str()) else {
                return false;
            };
            let matched = like_matches(text, pattern);
            if filter.operator == QueryOperator::Like {
                matched
            } else {
                !matched
            }
        }
        QueryOperator::In => filter.values.iter().any(|v| json_eq(field, &v.to_json())),
        QueryOperator::NotIn => !filter.values.iter().any(|v| json_eq(field, &v.to_json())),
        QueryOperator::Between => match filter.values.as_slice() {
            [low, high] => {
                matches!(
                    compare_json(field, &low.to_json()),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    compare_json(field, &high.to_json()),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
            _ => false,
        },
    }
}

/// NULLs sort after every value, as PostgreSQL does for ascending order
fn compare_for_sort(left: &JsonValue, right: &JsonValue) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_json(left, right).unwrap_or(Ordering::Equal),
    }
}

/// SQL LIKE with `\` as the escape character, as PostgreSQL defaults to.
/// A malformed pattern matches nothing.
fn like_matches(text: &str, pattern: &str) -> bool {
    <str as Like<true>>::like(text, pattern).unwrap_or(false)
}
