//! Query Builder Types - filters, ordering and their operators

use std::fmt;

use crate::backends::DatabaseValue;

/// Comparison applied by a [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Between,
}

impl QueryOperator {
    /// SQL spelling of the operator
    pub fn as_sql(self) -> &'static str {
        use QueryOperator::*;
        match self {
            Equal => "=",
            NotEqual => "!=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            LessThan => "<",
            LessThanOrEqual => "<=",
            Like => "LIKE",
            NotLike => "NOT LIKE",
            In => "IN",
            NotIn => "NOT IN",
            IsNull => "IS NULL",
            IsNotNull => "IS NOT NULL",
            Between => "BETWEEN",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single boolean condition over one column.
///
/// `value` carries the operand of binary operators; `values` carries the
/// list for `IN`/`NOT IN` and the two bounds for `BETWEEN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<DatabaseValue>,
    pub values: Vec<DatabaseValue>,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.operator)?;
        match self.operator {
            QueryOperator::IsNull | QueryOperator::IsNotNull => Ok(()),
            QueryOperator::In | QueryOperator::NotIn => {
                write!(f, " {}", DatabaseValue::Array(self.values.clone()))
            }
            QueryOperator::Between => match self.values.as_slice() {
                [low, high] => write!(f, " {} AND {}", low, high),
                _ => write!(f, " ?"),
            },
            _ => match &self.value {
                Some(value) => write!(f, " {}", value),
                None => write!(f, " NULL"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        })
    }
}

/// Sort directive; earlier clauses take precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}
