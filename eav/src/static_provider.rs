//! In-memory attribute metadata

use crate::errors::EavError;
use crate::metadata::{AttributeMetadata, AttributeMetadataProvider};
use async_trait::async_trait;
use std::collections::HashMap;

/// Provider backed by a fixed set of descriptors
#[derive(Debug, Clone, Default)]
pub struct StaticAttributeMetadata {
    entity_types: HashMap<String, HashMap<String, AttributeMetadata>>,
}

impl StaticAttributeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute under an entity type code
    pub fn with_attribute(mut self, entity_type: &str, metadata: AttributeMetadata) -> Self {
        self.entity_types
            .entry(entity_type.to_string())
            .or_default()
            .insert(metadata.attribute_code.clone(), metadata);
        self
    }

    pub fn get(&self, entity_type: &str, attribute_code: &str) -> Result<&AttributeMetadata, EavError> {
        let attributes = self
            .entity_types
            .get(entity_type)
            .ok_or_else(|| EavError::UnknownEntityType(entity_type.to_string()))?;

        attributes
            .get(attribute_code)
            .ok_or_else(|| EavError::unknown_attribute(entity_type, attribute_code))
    }
}

#[async_trait]
impl AttributeMetadataProvider for StaticAttributeMetadata {
    async fn attribute_metadata(
        &self,
        entity_type: &str,
        attribute_code: &str,
    ) -> Result<AttributeMetadata, EavError> {
        self.get(entity_type, attribute_code).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::BackendType;

    fn provider() -> StaticAttributeMetadata {
        StaticAttributeMetadata::new().with_attribute(
            "customer",
            AttributeMetadata::from_definition(
                1,
                "customer_entity",
                7,
                "lastname",
                BackendType::Varchar,
                None,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_lookup() {
        let metadata = provider()
            .attribute_metadata("customer", "lastname")
            .await
            .unwrap();

        assert_eq!(metadata.attribute_id, 7);
        assert_eq!(metadata.attribute_table.as_str(), "customer_entity_varchar");
    }

    #[tokio::test]
    async fn test_unknown_entity_and_attribute() {
        let provider = provider();

        let err = provider.attribute_metadata("order", "lastname").await.unwrap_err();
        assert!(matches!(err, EavError::UnknownEntityType(t) if t == "order"));

        let err = provider.attribute_metadata("customer", "dob").await.unwrap_err();
        assert!(matches!(
            err,
            EavError::UnknownAttribute { attribute_code, .. } if attribute_code == "dob"
        ));
    }
}
