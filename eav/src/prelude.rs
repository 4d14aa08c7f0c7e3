//! Convenience re-exports for attribute metadata lookups

pub use crate::errors::EavError;
pub use crate::metadata::{AttributeMetadata, AttributeMetadataProvider, BackendType};
pub use crate::repository::EavAttributeRepository;
pub use crate::static_provider::StaticAttributeMetadata;

pub use async_trait::async_trait;
