//! Core newsletter functionality
//!
//! [`Newsletter`] owns the connection pool and the attribute metadata
//! repository, and hands out subscriber collections configured from
//! [`AppConfig`].

use sqlx::PgPool;
use std::time::Duration;

use crate::errors::NewsletterError;
use crate::subscriber::{QueueId, Subscriber, SubscriberCollection};
use config::AppConfig;
use eav::EavAttributeRepository;

pub struct Newsletter {
    pool: PgPool,
    config: AppConfig,
    attributes: EavAttributeRepository,
}

impl Newsletter {
    /// Connect to the configured database
    pub async fn new(config: AppConfig) -> Result<Self, NewsletterError> {
        config.validate()?;

        let database = &config.database;
        let connection_string = database.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        tracing::info!(host = %database.host, database = %database.database, "connected");

        Ok(Self::with_pool(pool, config))
    }

    /// Use an existing pool
    pub fn with_pool(pool: PgPool, config: AppConfig) -> Self {
        let attributes = EavAttributeRepository::new(pool.clone(), config.eav.cache_metadata);
        Self {
            pool,
            config,
            attributes,
        }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn attributes(&self) -> &EavAttributeRepository {
        &self.attributes
    }

    /// A fresh subscriber collection over the configured tables
    pub fn subscribers(&self) -> Result<SubscriberCollection, NewsletterError> {
        Ok(SubscriberCollection::new(
            &self.config.newsletter,
            &self.config.eav.customer_entity_type,
        )?)
    }

    /// First batch of subscribers still waiting for a queue's letter,
    /// with customer names and subscriber type
    pub async fn queue_recipients(
        &self,
        queue_id: impl Into<QueueId>,
        batch_size: Option<i64>,
    ) -> Result<Vec<Subscriber>, NewsletterError> {
        let queue_id = queue_id.into();
        let batch_size = batch_size.unwrap_or(self.config.newsletter.default_page_size);

        let collection = self
            .subscribers()?
            .use_queue(queue_id)
            .use_only_unsent()
            .show_customer_info(&self.attributes)
            .await?
            .add_subscriber_type_field()
            .set_page_size(batch_size)
            .set_cur_page(1);

        let recipients = collection.load(&self.pool).await?;
        crate::debug_log!(queue_id = queue_id.0, count = recipients.len(), "loaded queue recipients");
        Ok(recipients)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), NewsletterError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
