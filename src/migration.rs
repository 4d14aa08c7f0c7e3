//! Schema installation
//!
//! Creates the tables the subscriber collection reads and registers the
//! customer name attributes in the attribute metadata tables.

use crate::core::Newsletter;
use crate::errors::NewsletterError;

const EAV_ENTITY_TYPE_TABLE: &str = "eav_entity_type";
const EAV_ATTRIBUTE_TABLE: &str = "eav_attribute";
const CUSTOMER_ENTITY_TABLE: &str = "customer_entity";
const CUSTOMER_NAME_ATTRIBUTES: [&str; 2] = ["firstname", "lastname"];

impl Newsletter {
    fn create_table_statements(&self) -> Vec<String> {
        let newsletter = &self.config().newsletter;
        let store = newsletter.store_table_name();
        let subscriber = newsletter.subscriber_table_name();
        let link = newsletter.queue_link_table_name();

        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {store} (
                    store_id INTEGER PRIMARY KEY,
                    code VARCHAR(32) NOT NULL,
                    website_id INTEGER NOT NULL DEFAULT 0,
                    group_id INTEGER NOT NULL DEFAULT 0,
                    name VARCHAR(255) NOT NULL DEFAULT ''
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {subscriber} (
                    subscriber_id SERIAL PRIMARY KEY,
                    store_id INTEGER NOT NULL DEFAULT 0,
                    change_status_at TIMESTAMPTZ,
                    customer_id INTEGER NOT NULL DEFAULT 0,
                    subscriber_email VARCHAR(150),
                    subscriber_status INTEGER NOT NULL DEFAULT 0,
                    subscriber_confirm_code VARCHAR(32)
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {link} (
                    queue_link_id SERIAL PRIMARY KEY,
                    queue_id INTEGER NOT NULL,
                    subscriber_id INTEGER NOT NULL REFERENCES {subscriber} (subscriber_id) ON DELETE CASCADE,
                    letter_sent_at TIMESTAMPTZ
                )"
            ),
            format!("CREATE INDEX IF NOT EXISTS idx_{subscriber}_customer_id ON {subscriber} (customer_id)"),
            format!("CREATE INDEX IF NOT EXISTS idx_{subscriber}_store_id ON {subscriber} (store_id)"),
            format!("CREATE INDEX IF NOT EXISTS idx_{link}_queue_id ON {link} (queue_id, letter_sent_at)"),
            format!("CREATE INDEX IF NOT EXISTS idx_{link}_subscriber_id ON {link} (subscriber_id)"),
            format!(
                "CREATE TABLE IF NOT EXISTS {EAV_ENTITY_TYPE_TABLE} (
                    entity_type_id SERIAL PRIMARY KEY,
                    entity_type_code VARCHAR(50) NOT NULL UNIQUE,
                    entity_table VARCHAR(255) NOT NULL
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {EAV_ATTRIBUTE_TABLE} (
                    attribute_id SERIAL PRIMARY KEY,
                    entity_type_id INTEGER NOT NULL REFERENCES {EAV_ENTITY_TYPE_TABLE} (entity_type_id) ON DELETE CASCADE,
                    attribute_code VARCHAR(255) NOT NULL,
                    backend_type VARCHAR(8) NOT NULL DEFAULT 'static',
                    backend_table VARCHAR(255),
                    UNIQUE (entity_type_id, attribute_code)
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {CUSTOMER_ENTITY_TABLE} (
                    entity_id SERIAL PRIMARY KEY,
                    email VARCHAR(255)
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {CUSTOMER_ENTITY_TABLE}_varchar (
                    value_id SERIAL PRIMARY KEY,
                    entity_id INTEGER NOT NULL,
                    attribute_id INTEGER NOT NULL,
                    value VARCHAR(255),
                    UNIQUE (entity_id, attribute_id)
                )"
            ),
        ]
    }

    fn drop_table_statements(&self) -> Vec<String> {
        let newsletter = &self.config().newsletter;

        [
            newsletter.queue_link_table_name(),
            newsletter.subscriber_table_name(),
            newsletter.store_table_name(),
            format!("{CUSTOMER_ENTITY_TABLE}_varchar"),
            CUSTOMER_ENTITY_TABLE.to_string(),
            EAV_ATTRIBUTE_TABLE.to_string(),
            EAV_ENTITY_TYPE_TABLE.to_string(),
        ]
        .into_iter()
        .map(|table| format!("DROP TABLE IF EXISTS {table} CASCADE"))
        .collect()
    }

    /// Create the subscriber, queue-link, store and attribute tables.
    /// If recreate is true, drops existing tables first
    pub async fn install_schema(&self, recreate: bool) -> Result<(), NewsletterError> {
        if recreate {
            for drop_sql in self.drop_table_statements() {
                tracing::info!(sql = %drop_sql, "dropping table");
                sqlx::query(&drop_sql).execute(self.pool()).await?;
            }
        }

        for create_sql in self.create_table_statements() {
            tracing::info!(sql = %create_sql, "creating schema object");
            sqlx::query(&create_sql).execute(self.pool()).await?;
        }

        let entity_type = &self.config().eav.customer_entity_type;
        sqlx::query(&format!(
            "INSERT INTO {EAV_ENTITY_TYPE_TABLE} (entity_type_code, entity_table) \
             VALUES ($1, $2) ON CONFLICT (entity_type_code) DO NOTHING"
        ))
        .bind(entity_type)
        .bind(CUSTOMER_ENTITY_TABLE)
        .execute(self.pool())
        .await?;

        for attribute_code in CUSTOMER_NAME_ATTRIBUTES {
            tracing::info!(entity_type = %entity_type, attribute_code, "registering attribute");
            sqlx::query(&format!(
                "INSERT INTO {EAV_ATTRIBUTE_TABLE} (entity_type_id, attribute_code, backend_type) \
                 SELECT entity_type_id, $2, 'varchar' FROM {EAV_ENTITY_TYPE_TABLE} \
                 WHERE entity_type_code = $1 \
                 ON CONFLICT (entity_type_id, attribute_code) DO NOTHING"
            ))
            .bind(entity_type)
            .bind(attribute_code)
            .execute(self.pool())
            .await?;
        }

        // Attribute ids may have changed after a recreate
        self.attributes().clear_cache().await;

        Ok(())
    }
}
