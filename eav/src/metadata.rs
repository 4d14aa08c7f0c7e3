//! Attribute descriptors
//!
//! An attribute's values live in a table chosen by its backend type:
//! `static` attributes are columns of the entity table itself, the others
//! are rows in `<entity_table>_<backend_type>` unless the attribute names its
//! own backend table.

use crate::errors::EavError;
use async_trait::async_trait;
use db_collection::ValidatedTableName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    Static,
    Varchar,
    Int,
    Text,
    Decimal,
    Datetime,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Static => "static",
            BackendType::Varchar => "varchar",
            BackendType::Int => "int",
            BackendType::Text => "text",
            BackendType::Decimal => "decimal",
            BackendType::Datetime => "datetime",
        }
    }
}

impl FromStr for BackendType {
    type Err = EavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(BackendType::Static),
            "varchar" => Ok(BackendType::Varchar),
            "int" => Ok(BackendType::Int),
            "text" => Ok(BackendType::Text),
            "decimal" => Ok(BackendType::Decimal),
            "datetime" => Ok(BackendType::Datetime),
            other => Err(EavError::UnknownBackendType(other.to_string())),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved description of one attribute of an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMetadata {
    pub entity_type_id: i32,
    pub attribute_id: i32,
    pub attribute_code: String,
    pub backend_type: BackendType,
    pub attribute_table: ValidatedTableName,
}

impl AttributeMetadata {
    /// Build a descriptor, deriving the value table from the entity table
    pub fn from_definition(
        entity_type_id: i32,
        entity_table: &str,
        attribute_id: i32,
        attribute_code: impl Into<String>,
        backend_type: BackendType,
        backend_table: Option<&str>,
    ) -> Result<Self, EavError> {
        Ok(Self {
            entity_type_id,
            attribute_id,
            attribute_code: attribute_code.into(),
            backend_type,
            attribute_table: attribute_table(entity_table, backend_type, backend_table)?,
        })
    }
}

/// Table holding the values of an attribute
pub fn attribute_table(
    entity_table: &str,
    backend_type: BackendType,
    backend_table: Option<&str>,
) -> Result<ValidatedTableName, EavError> {
    let table = match (backend_table.filter(|t| !t.is_empty()), backend_type) {
        (Some(table), _) => table.to_string(),
        (None, BackendType::Static) => entity_table.to_string(),
        (None, backend_type) => format!("{}_{}", entity_table, backend_type),
    };

    Ok(ValidatedTableName::new(&table)?)
}

/// Source of attribute descriptors
#[async_trait]
pub trait AttributeMetadataProvider: Send + Sync {
    async fn attribute_metadata(
        &self,
        entity_type: &str,
        attribute_code: &str,
    ) -> Result<AttributeMetadata, EavError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_parsing() {
        assert_eq!("varchar".parse::<BackendType>().unwrap(), BackendType::Varchar);
        assert_eq!("static".parse::<BackendType>().unwrap(), BackendType::Static);
        assert!(matches!(
            "blob".parse::<BackendType>(),
            Err(EavError::UnknownBackendType(t)) if t == "blob"
        ));
    }

    #[test]
    fn test_attribute_table_resolution() {
        assert_eq!(
            attribute_table("customer_entity", BackendType::Varchar, None)
                .unwrap()
                .as_str(),
            "customer_entity_varchar"
        );
        assert_eq!(
            attribute_table("customer_entity", BackendType::Static, None)
                .unwrap()
                .as_str(),
            "customer_entity"
        );
        assert_eq!(
            attribute_table("customer_entity", BackendType::Int, Some("customer_grid_int"))
                .unwrap()
                .as_str(),
            "customer_grid_int"
        );
        // Empty backend table falls back to the derived name
        assert_eq!(
            attribute_table("customer_entity", BackendType::Text, Some(""))
                .unwrap()
                .as_str(),
            "customer_entity_text"
        );
    }

    #[test]
    fn test_attribute_table_is_validated() {
        let err = attribute_table("customer_entity", BackendType::Varchar, Some("x; DROP"))
            .unwrap_err();
        assert!(matches!(err, EavError::InvalidTable(_)));
    }
}
