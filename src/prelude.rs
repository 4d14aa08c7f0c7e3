//! Convenience re-exports for common newsletter usage
//!
//! # Example
//!
//! ```rust
//! use newsletter::prelude::*;
//! ```

// Core components
pub use crate::core::Newsletter;
pub use crate::errors::NewsletterError;
pub use crate::subscriber::{
    QueueId, StoreIds, Subscriber, SubscriberCollection, SubscriberStatus, SubscriberType,
};

// Centralized config
pub use config::{AppConfig, DatabaseConfig, EavConfig, NewsletterConfig};

// Collection and attribute metadata types
pub use db_collection::prelude::*;
pub use eav::prelude::*;

// Common external dependencies
pub use anyhow;
pub use sqlx;
pub use tokio;
