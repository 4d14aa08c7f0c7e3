//! DB Collection - record collections over typed SELECT statements
//!
//! This crate provides the statement builder, the logical field map and the
//! generic collection that executes statements through sqlx.

pub mod collection;
pub mod errors;
pub mod field_map;
pub mod prelude;
pub mod query_builder;
pub mod validation;

pub use collection::GenericCollection;
pub use errors::CollectionError;
pub use field_map::FieldMap;
pub use query_builder::{
    Expr, FieldCondition, QueryFilter, QueryOperator, SelectStatement, SortOrder,
};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
