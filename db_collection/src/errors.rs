use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Database error during {operation} on {table}: {source}")]
    Database {
        table: String,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid filter condition for '{field}': {message}")]
    InvalidCondition { field: String, message: String },
}

impl CollectionError {
    pub fn database(table: &str, operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            operation,
            source,
        }
    }

    pub fn invalid_condition(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidCondition {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
