//! Error types for attribute metadata lookups

use db_collection::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EavError {
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Unknown attribute '{attribute_code}' for entity type '{entity_type}'")]
    UnknownAttribute {
        entity_type: String,
        attribute_code: String,
    },

    #[error("Unknown backend type: {0}")]
    UnknownBackendType(String),

    #[error("Invalid attribute table: {0}")]
    InvalidTable(#[from] ValidationError),

    #[error("Database error during {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl EavError {
    pub fn unknown_attribute(entity_type: &str, attribute_code: &str) -> Self {
        Self::UnknownAttribute {
            entity_type: entity_type.to_string(),
            attribute_code: attribute_code.to_string(),
        }
    }

    pub fn database(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database { operation, source }
    }
}
