//! In-memory evaluation of expressions and filters against one row.
//!
//! Follows SQL semantics closely enough to check generated expressions
//! without a database: comparisons involving NULL are unknown (`None`), and
//! AND/OR use three-valued logic.

use crate::query_builder::expression::{ColumnRef, Expr, Literal};
use crate::query_builder::filter::{LogicalOperator, QueryFilter, QueryOperator};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A row keyed by `alias.column` or by bare column name
pub type Row = Map<String, Value>;

fn lookup(row: &Row, column: &ColumnRef) -> Value {
    if let Some(table) = &column.table {
        if let Some(value) = row.get(&format!("{}.{}", table, column.column)) {
            return value.clone();
        }
    }
    row.get(&column.column).cloned().unwrap_or(Value::Null)
}

impl Expr {
    /// Value of this expression for `row`. Aggregates have no per-row value.
    pub fn evaluate(&self, row: &Row) -> Option<Value> {
        match self {
            Expr::Column(column) => Some(lookup(row, column)),
            Expr::Literal(Literal::Int(value)) => Some(Value::from(*value)),
            Expr::Literal(Literal::Bool(value)) => Some(Value::Bool(*value)),
            Expr::Literal(Literal::Null) => Some(Value::Null),
            Expr::Case {
                when,
                then,
                otherwise,
            } => {
                if when.evaluate(row) == Some(true) {
                    then.evaluate(row)
                } else {
                    otherwise.evaluate(row)
                }
            }
            Expr::Count { .. } => None,
        }
    }
}

impl QueryFilter {
    /// `Some(true)` / `Some(false)` when decidable, `None` for SQL unknown
    pub fn evaluate(&self, row: &Row) -> Option<bool> {
        match self {
            QueryFilter::Condition(condition) => {
                let left = condition.field.evaluate(row)?;
                apply(condition.operator, &left, condition.value.as_ref())
            }
            QueryFilter::Compare {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate(row)?;
                let right = right.evaluate(row)?;
                apply(*operator, &left, Some(&right))
            }
            QueryFilter::Group { operator, filters } => {
                let results = filters.iter().map(|filter| filter.evaluate(row));
                match operator {
                    LogicalOperator::And => results.fold(Some(true), |acc, r| match (acc, r) {
                        (Some(false), _) | (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    }),
                    LogicalOperator::Or => results.fold(Some(false), |acc, r| match (acc, r) {
                        (Some(true), _) | (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    }),
                }
            }
        }
    }
}

fn apply(operator: QueryOperator, left: &Value, right: Option<&Value>) -> Option<bool> {
    match operator {
        QueryOperator::IsNull => return Some(left.is_null()),
        QueryOperator::IsNotNull => return Some(!left.is_null()),
        // Rendered as IS NULL / IS NOT NULL by the generator
        QueryOperator::Eq if matches!(right, None | Some(Value::Null)) => {
            return Some(left.is_null())
        }
        QueryOperator::Ne if matches!(right, None | Some(Value::Null)) => {
            return Some(!left.is_null())
        }
        _ => {}
    }

    if left.is_null() {
        return None;
    }

    match operator {
        QueryOperator::Eq => compare(left, right?).map(|o| o == Ordering::Equal),
        QueryOperator::Ne => compare(left, right?).map(|o| o != Ordering::Equal),
        QueryOperator::Gt => compare(left, right?).map(|o| o == Ordering::Greater),
        QueryOperator::Gte => compare(left, right?).map(|o| o != Ordering::Less),
        QueryOperator::Lt => compare(left, right?).map(|o| o == Ordering::Less),
        QueryOperator::Lte => compare(left, right?).map(|o| o != Ordering::Greater),
        QueryOperator::Like | QueryOperator::NotLike => {
            let (Value::String(text), Some(Value::String(pattern))) = (left, right) else {
                return None;
            };
            let matched = like_match(text, pattern);
            Some(if operator == QueryOperator::Like {
                matched
            } else {
                !matched
            })
        }
        QueryOperator::In | QueryOperator::NotIn => {
            let candidates: &[Value] = match right {
                Some(Value::Array(values)) => values.as_slice(),
                Some(value) => std::slice::from_ref(value),
                None => &[],
            };
            let found = candidates
                .iter()
                .any(|candidate| compare(left, candidate) == Some(Ordering::Equal));
            Some(if operator == QueryOperator::In {
                found
            } else {
                !found
            })
        }
        QueryOperator::IsNull | QueryOperator::IsNotNull => unreachable!("handled above"),
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// SQL LIKE with `%`, `_` and backslash escapes
pub fn like_match(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_match_from(&value, &pattern)
}

fn like_match_from(value: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => value.is_empty(),
        Some(('%', rest)) => (0..=value.len()).any(|skip| like_match_from(&value[skip..], rest)),
        Some(('_', rest)) => !value.is_empty() && like_match_from(&value[1..], rest),
        Some(('\\', rest)) => match (rest.split_first(), value.split_first()) {
            (Some((p, rest)), Some((c, tail))) if p == c => like_match_from(tail, rest),
            _ => false,
        },
        Some((p, rest)) => match value.split_first() {
            Some((c, tail)) if c == p => like_match_from(tail, rest),
            _ => false,
        },
    }
}
