//! WHERE / HAVING / ON predicates

use crate::query_builder::expression::Expr;
use serde_json::Value;

/// Query condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,        // =
    Ne,        // !=
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    NotLike,   // NOT LIKE
    In,        // IN
    NotIn,     // NOT IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
}

impl QueryOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::NotLike => "NOT LIKE",
            QueryOperator::In => "IN",
            QueryOperator::NotIn => "NOT IN",
            QueryOperator::IsNull => "IS NULL",
            QueryOperator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Expression compared against a bound value
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: Expr,
    pub operator: QueryOperator,
    pub value: Option<Value>, // None for IS NULL/IS NOT NULL
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    /// Expression compared against another expression, e.g. a join key
    Compare {
        left: Expr,
        operator: QueryOperator,
        right: Expr,
    },
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
}

impl QueryFilter {
    pub fn condition(field: impl Into<Expr>, operator: QueryOperator, value: Option<Value>) -> Self {
        Self::Condition(QueryCondition {
            field: field.into(),
            operator,
            value,
        })
    }

    pub fn compare(left: impl Into<Expr>, operator: QueryOperator, right: impl Into<Expr>) -> Self {
        Self::Compare {
            left: left.into(),
            operator,
            right: right.into(),
        }
    }

    /// `left = right` between two expressions
    pub fn equals(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::compare(left, QueryOperator::Eq, right)
    }

    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    pub fn eq(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Eq, Some(value))
    }

    pub fn ne(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Ne, Some(value))
    }

    pub fn gt(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gt, Some(value))
    }

    pub fn gte(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gte, Some(value))
    }

    pub fn lt(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lt, Some(value))
    }

    pub fn lte(field: impl Into<Expr>, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lte, Some(value))
    }

    pub fn like(field: impl Into<Expr>, pattern: &str) -> Self {
        Self::condition(
            field,
            QueryOperator::Like,
            Some(Value::String(pattern.to_string())),
        )
    }

    pub fn not_like(field: impl Into<Expr>, pattern: &str) -> Self {
        Self::condition(
            field,
            QueryOperator::NotLike,
            Some(Value::String(pattern.to_string())),
        )
    }

    pub fn in_values(field: impl Into<Expr>, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::In, Some(Value::Array(values)))
    }

    pub fn not_in_values(field: impl Into<Expr>, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::NotIn, Some(Value::Array(values)))
    }

    pub fn is_null(field: impl Into<Expr>) -> Self {
        Self::condition(field, QueryOperator::IsNull, None)
    }

    pub fn is_not_null(field: impl Into<Expr>) -> Self {
        Self::condition(field, QueryOperator::IsNotNull, None)
    }

    /// True when the filter mentions `column` of table alias `table`
    pub fn references(&self, table: &str, column: &str) -> bool {
        fn expr_references(expr: &Expr, table: &str, column: &str) -> bool {
            match expr {
                Expr::Column(c) => c.table.as_deref() == Some(table) && c.column == column,
                Expr::Literal(_) => false,
                Expr::Case {
                    when,
                    then,
                    otherwise,
                } => {
                    when.references(table, column)
                        || expr_references(then, table, column)
                        || expr_references(otherwise, table, column)
                }
                Expr::Count { args, .. } => args.iter().any(|a| expr_references(a, table, column)),
            }
        }

        match self {
            QueryFilter::Condition(condition) => expr_references(&condition.field, table, column),
            QueryFilter::Compare { left, right, .. } => {
                expr_references(left, table, column) || expr_references(right, table, column)
            }
            QueryFilter::Group { filters, .. } => {
                filters.iter().any(|f| f.references(table, column))
            }
        }
    }
}
