//! Error types for the newsletter crate
//!
//! Errors from the collection, attribute metadata and configuration layers
//! pass through unchanged.

use config::ConfigError;
use db_collection::CollectionError;
use eav::EavError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsletterError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Eav(#[from] EavError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),
}
