//! Filter constructors and the WHERE side of the query builder

use super::builder::QueryBuilder;
use super::types::*;
use crate::backends::DatabaseValue;

impl Filter {
    fn binary(column: impl Into<String>, operator: QueryOperator, value: DatabaseValue) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value),
            values: Vec::new(),
        }
    }

    fn list<T: Into<DatabaseValue>>(
        column: impl Into<String>,
        operator: QueryOperator,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn unary(column: impl Into<String>, operator: QueryOperator) -> Self {
        Self {
            column: column.into(),
            operator,
            value: None,
            values: Vec::new(),
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::Equal, value.into())
    }

    /// `column != value`
    pub fn ne(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::NotEqual, value.into())
    }

    pub fn gt(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::GreaterThan, value.into())
    }

    pub fn gte(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::GreaterThanOrEqual, value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::LessThan, value.into())
    }

    pub fn lte(column: impl Into<String>, value: impl Into<DatabaseValue>) -> Self {
        Self::binary(column, QueryOperator::LessThanOrEqual, value.into())
    }

    /// SQL `LIKE` with `%` and `_` wildcards
    pub fn like(column: impl Into<String>, pattern: &str) -> Self {
        Self::binary(column, QueryOperator::Like, pattern.into())
    }

    pub fn not_like(column: impl Into<String>, pattern: &str) -> Self {
        Self::binary(column, QueryOperator::NotLike, pattern.into())
    }

    pub fn is_in<T: Into<DatabaseValue>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::list(column, QueryOperator::In, values)
    }

    pub fn not_in<T: Into<DatabaseValue>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::list(column, QueryOperator::NotIn, values)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::unary(column, QueryOperator::IsNull)
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::unary(column, QueryOperator::IsNotNull)
    }

    /// Inclusive range `low <= column <= high`
    pub fn between(
        column: impl Into<String>,
        low: impl Into<DatabaseValue>,
        high: impl Into<DatabaseValue>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: QueryOperator::Between,
            value: None,
            values: vec![low.into(), high.into()],
        }
    }
}

impl<M> QueryBuilder<M> {
    /// Restrict the query by one more filter, AND-combined with the rest
    pub fn filter(mut self, filter: Filter) -> Self {
        self.query.filters.push(filter);
        self
    }

    /// Append filters in order
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.query.filters.extend(filters);
        self
    }

    /// Add WHERE condition with equality
    pub fn where_eq(self, column: &str, value: impl Into<DatabaseValue>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn where_in<T: Into<DatabaseValue>>(
        self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.filter(Filter::is_in(column, values))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.filter(Filter::is_null(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::eq("name", "bob").to_string(), "name = 'bob'");
        assert_eq!(Filter::is_null("deleted_at").to_string(), "deleted_at IS NULL");
        assert_eq!(Filter::is_in("id", [1, 2, 3]).to_string(), "id IN (1, 2, 3)");
        assert_eq!(
            Filter::between("age", 18, 65).to_string(),
            "age BETWEEN 18 AND 65"
        );
    }

    #[test]
    fn test_between_keeps_both_bounds() {
        let filter = Filter::between("price", 10, 20);
        assert_eq!(filter.values, vec![DatabaseValue::Int32(10), DatabaseValue::Int32(20)]);
        assert!(filter.value.is_none());
    }
}
