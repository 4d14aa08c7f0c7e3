use newsletter::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("📬 Newsletter Demo\n");

    // Falls back to a local database when no config file is present
    let config = AppConfig::load().unwrap_or_else(|_| {
        AppConfig::new(DatabaseConfig::new(
            "localhost".to_string(),  // host
            5432,                     // port
            "newsletter".to_string(), // database
            "postgres".to_string(),   // username
            "password".to_string(),   // password
            1,                        // min_connections
            5,                        // max_connections
            30,                       // connection_timeout_seconds
            600,                      // idle_timeout_seconds
            3600,                     // max_lifetime_seconds
        ))
    });

    let newsletter = Newsletter::new(config).await?;
    newsletter.health_check().await?;
    println!("✅ Database connected");

    newsletter.install_schema(true).await?;
    println!("✅ Schema installed");

    let pool = newsletter.pool();
    let subscriber_table = newsletter.config().newsletter.subscriber_table_name();
    let link_table = newsletter.config().newsletter.queue_link_table_name();
    let store_table = newsletter.config().newsletter.store_table_name();

    sqlx::query(&format!(
        "INSERT INTO {} (store_id, code, website_id, group_id, name) \
         VALUES (1, 'default', 1, 1, 'Default Store View')",
        store_table
    ))
    .execute(pool)
    .await?;

    let customer_id: i32 =
        sqlx::query_scalar("INSERT INTO customer_entity (email) VALUES ($1) RETURNING entity_id")
            .bind("jane@example.com")
            .fetch_one(pool)
            .await?;
    for (code, value) in [("firstname", "Jane"), ("lastname", "Smith")] {
        let attribute = newsletter.attributes().attribute_metadata("customer", code).await?;
        sqlx::query(&format!(
            "INSERT INTO {} (entity_id, attribute_id, value) VALUES ($1, $2, $3)",
            attribute.attribute_table
        ))
        .bind(customer_id)
        .bind(attribute.attribute_id)
        .bind(value)
        .execute(pool)
        .await?;
    }

    for (customer, email) in [(0, "guest@example.com"), (customer_id, "jane@example.com")] {
        let subscriber_id: i32 = sqlx::query_scalar(&format!(
            "INSERT INTO {} (store_id, customer_id, subscriber_email, subscriber_status) \
             VALUES (1, $1, $2, $3) RETURNING subscriber_id",
            subscriber_table
        ))
        .bind(customer)
        .bind(email)
        .bind(SubscriberStatus::Subscribed.code())
        .fetch_one(pool)
        .await?;

        sqlx::query(&format!(
            "INSERT INTO {} (queue_id, subscriber_id) VALUES ($1, $2)",
            link_table
        ))
        .bind(1)
        .bind(subscriber_id)
        .execute(pool)
        .await?;
    }
    println!("✅ Sample subscribers queued");

    // Compose the recipient query
    let recipients = newsletter
        .subscribers()?
        .use_queue(1)
        .use_only_unsent()
        .use_only_subscribed()
        .show_customer_info(newsletter.attributes())
        .await?
        .show_store_info()
        .add_subscriber_type_field()
        .add_store_filter([1])
        .set_page_size(10);

    let (sql, params) = recipients.select_sql();
    println!("\n🔎 SQL: {}\n   params: {:?}", sql, params);
    let (count_sql, _) = recipients.select_count_sql();
    println!("🔢 Count SQL: {}", count_sql);

    println!("\n📋 Recipients ({}):", recipients.size(pool).await?);
    for subscriber in recipients.load(pool).await? {
        println!(
            "  - {} [{:?}] {} {} website={:?}",
            subscriber.subscriber_email.as_deref().unwrap_or("-"),
            subscriber.kind(),
            subscriber.customer_firstname.as_deref().unwrap_or(""),
            subscriber.customer_lastname.as_deref().unwrap_or(""),
            subscriber.website_id,
        );
    }

    let batch = newsletter.queue_recipients(1, Some(1)).await?;
    println!("\n📦 First batch of one: {:?}", batch.first().map(|s| s.subscriber_id));

    Ok(())
}
