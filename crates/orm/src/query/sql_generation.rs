//! Query Builder SQL generation
//!
//! Identifiers are quoted for the dialect and every value is bound as a
//! parameter, so the generated text depends only on the query's shape.

use super::builder::{QueryBuilder, SelectQuery};
use super::types::*;
use crate::backends::{DatabaseValue, SqlDialect};

struct SqlWriter {
    dialect: SqlDialect,
    sql: String,
    params: Vec<DatabaseValue>,
}

impl SqlWriter {
    fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    fn push_identifier(&mut self, identifier: &str) {
        let quoted = self.dialect.quote_identifier(identifier);
        self.sql.push_str(&quoted);
    }

    fn push_param(&mut self, value: &DatabaseValue) {
        let placeholder = self.dialect.parameter_placeholder(self.params.len());
        self.sql.push_str(&placeholder);
        self.params.push(value.clone());
    }

    fn finish(self) -> (String, Vec<DatabaseValue>) {
        (self.sql, self.params)
    }
}

impl SelectQuery {
    /// `SELECT * FROM ... [WHERE] [ORDER BY] [LIMIT] [OFFSET]`
    pub fn to_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        let mut writer = SqlWriter::new(dialect);
        self.write_select(&mut writer, "*");
        writer.finish()
    }

    /// Row count of exactly what the query would return.
    ///
    /// Ordering is dropped; a bounded query is counted through a subquery so
    /// the window still applies.
    pub fn to_count_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        let mut writer = SqlWriter::new(dialect);
        if self.is_bounded() {
            writer.push("SELECT COUNT(*) FROM (");
            self.write_select(&mut writer, "1");
            writer.push(") AS counted");
        } else {
            writer.push("SELECT COUNT(*) FROM ");
            writer.push_identifier(&self.table);
            self.write_where(&mut writer);
        }
        writer.finish()
    }

    /// `SELECT EXISTS(SELECT 1 ...)`, short-circuiting on the first match
    pub fn to_exists_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        let mut writer = SqlWriter::new(dialect);
        writer.push("SELECT EXISTS(");
        self.write_select(&mut writer, "1");
        writer.push(")");
        writer.finish()
    }

    fn write_select(&self, writer: &mut SqlWriter, projection: &str) {
        writer.push("SELECT ");
        writer.push(projection);
        writer.push(" FROM ");
        writer.push_identifier(&self.table);
        self.write_where(writer);
        self.write_order_limit(writer);
    }

    fn write_where(&self, writer: &mut SqlWriter) {
        if self.filters.is_empty() {
            return;
        }

        writer.push(" WHERE ");
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                writer.push(" AND ");
            }
            write_filter(writer, filter);
        }
    }

    fn write_order_limit(&self, writer: &mut SqlWriter) {
        if !self.order_by.is_empty() {
            writer.push(" ORDER BY ");
            for (i, clause) in self.order_by.iter().enumerate() {
                if i > 0 {
                    writer.push(", ");
                }
                writer.push_identifier(&clause.column);
                writer.push(&format!(" {}", clause.direction));
            }
        }

        match (self.limit, self.offset) {
            (Some(limit), _) => writer.push(&format!(" LIMIT {}", limit)),
            (None, Some(_)) => {
                if let Some(unbounded) = writer.dialect.unbounded_limit() {
                    writer.push(&format!(" LIMIT {}", unbounded));
                }
            }
            (None, None) => {}
        }

        if let Some(offset) = self.offset {
            writer.push(&format!(" OFFSET {}", offset));
        }
    }
}

fn write_filter(writer: &mut SqlWriter, filter: &Filter) {
    match filter.operator {
        // An empty IN list matches nothing and an empty NOT IN list matches
        // everything; neither is valid SQL when spelled out.
        QueryOperator::In | QueryOperator::NotIn if filter.values.is_empty() => {
            writer.push(if filter.operator == QueryOperator::In {
                "1 = 0"
            } else {
                "1 = 1"
            });
        }
        QueryOperator::In | QueryOperator::NotIn => {
            writer.push_identifier(&filter.column);
            writer.push(&format!(" {} (", filter.operator));
            for (j, value) in filter.values.iter().enumerate() {
                if j > 0 {
                    writer.push(", ");
                }
                writer.push_param(value);
            }
            writer.push(")");
        }
        QueryOperator::Between => {
            writer.push_identifier(&filter.column);
            writer.push(" BETWEEN ");
            let null = DatabaseValue::Null;
            writer.push_param(filter.values.first().unwrap_or(&null));
            writer.push(" AND ");
            writer.push_param(filter.values.get(1).unwrap_or(&null));
        }
        QueryOperator::IsNull | QueryOperator::IsNotNull => {
            writer.push_identifier(&filter.column);
            writer.push(&format!(" {}", filter.operator));
        }
        _ => {
            writer.push_identifier(&filter.column);
            writer.push(&format!(" {} ", filter.operator));
            let null = DatabaseValue::Null;
            writer.push_param(filter.value.as_ref().unwrap_or(&null));
        }
    }
}

impl<M> QueryBuilder<M> {
    pub fn to_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        self.query.to_sql_with_params(dialect)
    }

    pub fn to_count_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        self.query.to_count_sql_with_params(dialect)
    }

    pub fn to_exists_sql_with_params(&self, dialect: SqlDialect) -> (String, Vec<DatabaseValue>) {
        self.query.to_exists_sql_with_params(dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> SelectQuery {
        SelectQuery::new("users")
    }

    #[test]
    fn test_select_all_rows() {
        let (sql, params) = users().to_sql_with_params(SqlDialect::PostgreSQL);
        assert_eq!(sql, "SELECT * FROM \"users\"");
        assert!(params.is_empty());
    }

    #[test]
    fn test_filters_are_and_combined_in_order() {
        let query = QueryBuilder::<()>::from_select(users())
            .filter(Filter::eq("status", "active"))
            .filter(Filter::gte("age", 18))
            .filter(Filter::is_null("deleted_at"));
        let (sql, params) = query.to_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE \"status\" = $1 AND \"age\" >= $2 AND \"deleted_at\" IS NULL"
        );
        assert_eq!(params, vec![DatabaseValue::from("active"), DatabaseValue::from(18)]);
    }

    #[test]
    fn test_order_offset_limit() {
        let query = QueryBuilder::<()>::from_select(users())
            .order_by_desc("created_at")
            .order_by_asc("id")
            .offset(10)
            .limit(10);
        let (sql, _) = query.to_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(
            sql,
            "SELECT * FROM \"users\" ORDER BY \"created_at\" DESC, \"id\" ASC LIMIT 10 OFFSET 10"
        );
    }

    #[test]
    fn test_offset_without_limit_per_dialect() {
        let query = QueryBuilder::<()>::from_select(users()).offset(5);
        assert_eq!(
            query.to_sql_with_params(SqlDialect::PostgreSQL).0,
            "SELECT * FROM \"users\" OFFSET 5"
        );
        assert_eq!(
            query.to_sql_with_params(SqlDialect::SQLite).0,
            "SELECT * FROM \"users\" LIMIT -1 OFFSET 5"
        );
    }

    #[test]
    fn test_in_and_between_parameters() {
        let query = QueryBuilder::<()>::from_select(users())
            .filter(Filter::is_in("id", [1, 2, 3]))
            .filter(Filter::between("age", 20, 30));
        let (sql, params) = query.to_sql_with_params(SqlDialect::MySQL);

        assert_eq!(
            sql,
            "SELECT * FROM `users` WHERE `id` IN (?, ?, ?) AND `age` BETWEEN ? AND ?"
        );
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_empty_in_lists() {
        let query = QueryBuilder::<()>::from_select(users())
            .filter(Filter::is_in("id", Vec::<i32>::new()))
            .filter(Filter::not_in("id", Vec::<i32>::new()));
        let (sql, params) = query.to_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(sql, "SELECT * FROM \"users\" WHERE 1 = 0 AND 1 = 1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_count_ignores_ordering_of_unbounded_query() {
        let query = QueryBuilder::<()>::from_select(users())
            .filter(Filter::eq("status", "active"))
            .order_by_asc("id");
        let (sql, params) = query.to_count_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(sql, "SELECT COUNT(*) FROM \"users\" WHERE \"status\" = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_count_of_bounded_query_uses_subquery() {
        let query = QueryBuilder::<()>::from_select(users()).limit(3);
        let (sql, _) = query.to_count_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM (SELECT 1 FROM \"users\" LIMIT 3) AS counted"
        );
    }

    #[test]
    fn test_exists_sql() {
        let query = QueryBuilder::<()>::from_select(users()).filter(Filter::eq("email", "a@b.c"));
        let (sql, params) = query.to_exists_sql_with_params(SqlDialect::PostgreSQL);

        assert_eq!(
            sql,
            "SELECT EXISTS(SELECT 1 FROM \"users\" WHERE \"email\" = $1)"
        );
        assert_eq!(params, vec![DatabaseValue::from("a@b.c")]);
    }
}
