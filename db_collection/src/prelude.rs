//! Convenience re-exports for common db-collection usage

// Collection
pub use crate::collection::GenericCollection;
pub use crate::field_map::FieldMap;

// Error types
pub use crate::errors::CollectionError;

// Validation
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

// Query building
pub use crate::query_builder::{
    ColumnRef, Expr, FieldCondition, JoinClause, JoinType, Literal, QueryFilter, QueryOperator,
    SelectField, SelectPart, SelectStatement, SortOrder, MAIN_TABLE,
};

// Common external dependencies that are frequently used
pub use serde_json::{json, Value};
pub use sqlx::{FromRow, PgPool};
