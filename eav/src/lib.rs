//! EAV attribute metadata
//!
//! Resolves an entity type code and attribute code to the table and id that
//! hold the attribute's values.

pub mod errors;
pub mod metadata;
pub mod prelude;
pub mod repository;
pub mod static_provider;

pub use errors::EavError;
pub use metadata::{attribute_table, AttributeMetadata, AttributeMetadataProvider, BackendType};
pub use repository::EavAttributeRepository;
pub use static_provider::StaticAttributeMetadata;
