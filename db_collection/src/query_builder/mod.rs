//! Query builder utilities
//!
//! Typed SELECT statements, predicates and expressions, rendered to
//! PostgreSQL with `$n` placeholders.

pub mod builder;
pub mod condition;
pub mod evaluate;
pub mod expression;
pub mod filter;
pub mod grouping;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod select;
pub mod sql_generation;


#[cfg(test)]
mod integration_tests;

pub use builder::{SelectPart, SelectStatement};
pub use condition::FieldCondition;
pub use evaluate::Row;
pub use expression::{ColumnRef, Expr, Literal, MAIN_TABLE};
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use grouping::GroupBy;
pub use join::{JoinClause, JoinType};
pub use ordering::SortOrder;
pub use pagination::Pagination;
pub use select::SelectField;
pub use sql_generation::{SqlGenerator, SqlWriter};
