//! Condition specs accepted by `add_field_to_filter`
//!
//! A [`FieldCondition`] says what to compare with, without knowing which
//! expression the field name maps to. The collection resolves the field and
//! turns the pair into a [`QueryFilter`].

use crate::errors::CollectionError;
use crate::query_builder::expression::Expr;
use crate::query_builder::filter::QueryFilter;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldCondition {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gteq(Value),
    Lt(Value),
    Lteq(Value),
    Like(String),
    NotLike(String),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Null,
    NotNull,
    /// Inclusive range; either bound may be open
    Range {
        from: Option<Value>,
        to: Option<Value>,
    },
    /// OR of several conditions on the same field
    AnyOf(Vec<FieldCondition>),
}

impl FieldCondition {
    /// Build the filter for `expr`. `field` is only used in error messages.
    pub fn into_filter(self, field: &str, expr: Expr) -> Result<QueryFilter, CollectionError> {
        let filter = match self {
            FieldCondition::Eq(value) => QueryFilter::eq(expr, value),
            FieldCondition::Neq(value) => QueryFilter::ne(expr, value),
            FieldCondition::Gt(value) => QueryFilter::gt(expr, value),
            FieldCondition::Gteq(value) => QueryFilter::gte(expr, value),
            FieldCondition::Lt(value) => QueryFilter::lt(expr, value),
            FieldCondition::Lteq(value) => QueryFilter::lte(expr, value),
            FieldCondition::Like(pattern) => QueryFilter::like(expr, &pattern),
            FieldCondition::NotLike(pattern) => QueryFilter::not_like(expr, &pattern),
            FieldCondition::In(values) => QueryFilter::in_values(expr, values),
            FieldCondition::NotIn(values) => QueryFilter::not_in_values(expr, values),
            FieldCondition::Null => QueryFilter::is_null(expr),
            FieldCondition::NotNull => QueryFilter::is_not_null(expr),
            FieldCondition::Range { from, to } => match (from, to) {
                (Some(from), Some(to)) => QueryFilter::and(vec![
                    QueryFilter::gte(expr.clone(), from),
                    QueryFilter::lte(expr, to),
                ]),
                (Some(from), None) => QueryFilter::gte(expr, from),
                (None, Some(to)) => QueryFilter::lte(expr, to),
                (None, None) => {
                    return Err(CollectionError::invalid_condition(
                        field,
                        "range needs at least one bound",
                    ))
                }
            },
            FieldCondition::AnyOf(conditions) => {
                if conditions.is_empty() {
                    return Err(CollectionError::invalid_condition(
                        field,
                        "empty list of alternatives",
                    ));
                }
                let filters = conditions
                    .into_iter()
                    .map(|condition| condition.into_filter(field, expr.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                QueryFilter::or(filters)
            }
        };

        Ok(filter)
    }
}
