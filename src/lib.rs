//! # Newsletter
//!
//! Newsletter subscriber collections for PostgreSQL. A
//! [`SubscriberCollection`] composes the subscriber SELECT: queue linkage,
//! unsent letters, customer names resolved through EAV attribute metadata,
//! store information and the guest/customer type column.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use newsletter::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let newsletter = Newsletter::new(config).await?;
//!     newsletter.install_schema(false).await?;
//!
//!     let subscribers = newsletter
//!         .subscribers()?
//!         .use_queue(5)
//!         .use_only_unsent()
//!         .show_customer_info(newsletter.attributes())
//!         .await?
//!         .show_store_info()
//!         .set_page_size(50);
//!
//!     for subscriber in subscribers.load(newsletter.pool()).await? {
//!         println!("{:?} {:?}", subscriber.subscriber_email, subscriber.customer_lastname);
//!     }
//!     println!("total: {}", subscribers.size(newsletter.pool()).await?);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod subscriber;

// Re-export the main public types for convenience
pub use core::Newsletter;
pub use errors::NewsletterError;
pub use subscriber::{
    QueueId, StoreIds, Subscriber, SubscriberCollection, SubscriberStatus, SubscriberType,
};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, EavConfig, NewsletterConfig};

// Re-export workspace crates used in the public API
pub use db_collection;
pub use eav;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
