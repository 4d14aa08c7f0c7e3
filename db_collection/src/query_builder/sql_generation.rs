//! SQL rendering
//!
//! Placeholders are numbered by a single [`SqlWriter`] in the order they
//! appear in the statement text, so the value list can be bound as is.

use crate::query_builder::builder::SelectStatement;
use crate::query_builder::expression::Expr;
use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::join::JoinClause;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::select::SelectField;
use serde_json::Value;

/// Collects bound values while SQL is rendered
#[derive(Debug, Default)]
pub struct SqlWriter {
    values: Vec<Value>,
}

impl SqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value and return its placeholder
    pub fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

pub struct SqlGenerator;

impl SqlGenerator {
    /// Render a full SELECT statement
    pub fn build_select(statement: &SelectStatement) -> (String, Vec<Value>) {
        let mut writer = SqlWriter::new();
        let mut parts = Vec::with_capacity(8);

        parts.push(format!(
            "SELECT {}",
            Self::build_select_clause(&statement.columns, &mut writer)
        ));
        parts.push(format!(
            "FROM {} AS {}",
            statement.table, statement.alias
        ));

        let joins = Self::build_join_clause(&statement.joins, &mut writer);
        if !joins.is_empty() {
            parts.push(joins);
        }

        let where_clause = Self::build_conditions(&statement.conditions, &mut writer);
        if !where_clause.is_empty() {
            parts.push(format!("WHERE {}", where_clause));
        }

        if statement.group_by.has_fields() {
            let fields: Vec<String> = statement
                .group_by
                .fields
                .iter()
                .map(|field| Self::build_expr(field, &mut writer))
                .collect();
            parts.push(format!("GROUP BY {}", fields.join(", ")));
        }

        let having = Self::build_conditions(&statement.group_by.having, &mut writer);
        if !having.is_empty() {
            parts.push(format!("HAVING {}", having));
        }

        let order = Self::build_order_clause(&statement.order_by, &mut writer);
        if !order.is_empty() {
            parts.push(order);
        }

        let limit = Self::build_limit_clause(&statement.pagination);
        if !limit.is_empty() {
            parts.push(limit);
        }

        (parts.join(" "), writer.into_values())
    }

    /// Build a standalone WHERE clause from conditions
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<Value>) {
        let mut writer = SqlWriter::new();
        let conditions_sql = Self::build_conditions(conditions, &mut writer);

        if conditions_sql.is_empty() {
            (String::new(), writer.into_values())
        } else {
            (format!("WHERE {}", conditions_sql), writer.into_values())
        }
    }

    fn build_conditions(conditions: &[QueryFilter], writer: &mut SqlWriter) -> String {
        conditions
            .iter()
            .map(|condition| Self::build_filter(condition, writer))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    pub fn build_filter(filter: &QueryFilter, writer: &mut SqlWriter) -> String {
        match filter {
            QueryFilter::Condition(condition) => Self::build_single_condition(condition, writer),
            QueryFilter::Compare {
                left,
                operator,
                right,
            } => {
                let left = Self::build_expr(left, writer);
                match operator {
                    QueryOperator::IsNull | QueryOperator::IsNotNull => {
                        format!("{} {}", left, operator.to_sql())
                    }
                    QueryOperator::In | QueryOperator::NotIn => {
                        let right = Self::build_expr(right, writer);
                        format!("{} {} ({})", left, operator.to_sql(), right)
                    }
                    _ => {
                        let right = Self::build_expr(right, writer);
                        format!("{} {} {}", left, operator.to_sql(), right)
                    }
                }
            }
            QueryFilter::Group { operator, filters } => {
                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let mut rendered: Vec<String> = filters
                    .iter()
                    .map(|f| Self::build_filter(f, writer))
                    .collect();

                match rendered.len() {
                    0 => match operator {
                        LogicalOperator::And => "1=1".to_string(),
                        LogicalOperator::Or => "1=0".to_string(),
                    },
                    1 => rendered.remove(0),
                    _ => format!("({})", rendered.join(operator_str)),
                }
            }
        }
    }

    fn build_single_condition(condition: &QueryCondition, writer: &mut SqlWriter) -> String {
        let field = Self::build_expr(&condition.field, writer);

        match condition.operator {
            QueryOperator::Eq => match &condition.value {
                Some(Value::Null) | None => format!("{} IS NULL", field),
                Some(value) => format!("{} = {}", field, writer.bind(value.clone())),
            },
            QueryOperator::Ne => match &condition.value {
                Some(Value::Null) | None => format!("{} IS NOT NULL", field),
                Some(value) => format!("{} != {}", field, writer.bind(value.clone())),
            },
            QueryOperator::Gt
            | QueryOperator::Gte
            | QueryOperator::Lt
            | QueryOperator::Lte
            | QueryOperator::Like
            | QueryOperator::NotLike => match &condition.value {
                Some(value) => format!(
                    "{} {} {}",
                    field,
                    condition.operator.to_sql(),
                    writer.bind(value.clone())
                ),
                None => "1=0".to_string(), // Comparison without a value matches nothing
            },
            QueryOperator::In | QueryOperator::NotIn => {
                let values = match &condition.value {
                    Some(Value::Array(values)) => values.clone(),
                    Some(value) => vec![value.clone()],
                    None => Vec::new(),
                };

                if values.is_empty() {
                    return match condition.operator {
                        QueryOperator::In => "1=0".to_string(), // Empty IN clause
                        _ => "1=1".to_string(),                 // Empty NOT IN clause
                    };
                }

                let placeholders: Vec<String> =
                    values.into_iter().map(|value| writer.bind(value)).collect();

                format!(
                    "{} {} ({})",
                    field,
                    condition.operator.to_sql(),
                    placeholders.join(", ")
                )
            }
            QueryOperator::IsNull => format!("{} IS NULL", field),
            QueryOperator::IsNotNull => format!("{} IS NOT NULL", field),
        }
    }

    pub fn build_expr(expr: &Expr, writer: &mut SqlWriter) -> String {
        match expr {
            Expr::Column(column) => column.to_sql(),
            Expr::Literal(literal) => literal.to_sql(),
            Expr::Case {
                when,
                then,
                otherwise,
            } => {
                let when = Self::build_filter(when, writer);
                let then = Self::build_expr(then, writer);
                let otherwise = Self::build_expr(otherwise, writer);
                format!("CASE WHEN {} THEN {} ELSE {} END", when, then, otherwise)
            }
            Expr::Count { distinct, args } => {
                let rendered: Vec<String> =
                    args.iter().map(|arg| Self::build_expr(arg, writer)).collect();
                match (distinct, rendered.len()) {
                    (_, 0) => "COUNT(*)".to_string(),
                    (false, _) => format!("COUNT({})", rendered.join(", ")),
                    (true, 1) => format!("COUNT(DISTINCT {})", rendered[0]),
                    // PostgreSQL counts distinct tuples through a row constructor
                    (true, _) => format!("COUNT(DISTINCT ({}))", rendered.join(", ")),
                }
            }
        }
    }

    fn build_select_clause(fields: &[SelectField], writer: &mut SqlWriter) -> String {
        if fields.is_empty() {
            return "*".to_string();
        }

        fields
            .iter()
            .map(|field| match field {
                SelectField::AllOf(alias) => format!("{}.*", alias),
                SelectField::Expr { expr, alias } => {
                    let expr = Self::build_expr(expr, writer);
                    match alias {
                        Some(alias) => format!("{} AS {}", expr, alias),
                        None => expr,
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn build_join_clause(joins: &[JoinClause], writer: &mut SqlWriter) -> String {
        joins
            .iter()
            .map(|join| {
                let condition = if join.on.is_empty() {
                    "TRUE".to_string()
                } else {
                    Self::build_conditions(&join.on, writer)
                };

                format!(
                    "{} {} AS {} ON {}",
                    join.join_type.to_sql(),
                    join.table,
                    join.alias,
                    condition
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_order_clause(order_by: &[(Expr, SortOrder)], writer: &mut SqlWriter) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", Self::build_expr(field, writer), order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(pagination: &Pagination) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = pagination.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = pagination.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
