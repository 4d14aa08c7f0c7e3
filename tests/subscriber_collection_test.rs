//! Integration tests for the subscriber collection
//!
//! Runs the composed statements against PostgreSQL. Every test uses its own
//! table prefix; tests are skipped when DATABASE_URL is not set.

use newsletter::prelude::*;
use sqlx::PgPool;

// Schema installation touches shared attribute tables
static SCHEMA_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

async fn setup(prefix: &str) -> Option<Newsletter> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let mut config = AppConfig::new(DatabaseConfig::new(
        "localhost".to_string(),
        5432,
        "newsletter".to_string(),
        "postgres".to_string(),
        "password".to_string(),
        1,
        5,
        30,
        600,
        3600,
    ));
    config.newsletter.table_prefix = prefix.to_string();

    let newsletter = Newsletter::with_pool(pool, config);
    {
        let _guard = SCHEMA_LOCK.lock().await;
        newsletter
            .install_schema(false)
            .await
            .expect("Failed to install schema");
    }

    let newsletter_config = &newsletter.config().newsletter;
    for table in [
        newsletter_config.queue_link_table_name(),
        newsletter_config.subscriber_table_name(),
        newsletter_config.store_table_name(),
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(newsletter.pool())
            .await
            .expect("Failed to clean table");
    }

    Some(newsletter)
}

async fn insert_subscriber(
    newsletter: &Newsletter,
    store_id: i32,
    customer_id: i32,
    email: &str,
    status: SubscriberStatus,
) -> i32 {
    sqlx::query_scalar(&format!(
        "INSERT INTO {} (store_id, customer_id, subscriber_email, subscriber_status) \
         VALUES ($1, $2, $3, $4) RETURNING subscriber_id",
        newsletter.config().newsletter.subscriber_table_name()
    ))
    .bind(store_id)
    .bind(customer_id)
    .bind(email)
    .bind(status.code())
    .fetch_one(newsletter.pool())
    .await
    .expect("Failed to insert subscriber")
}

async fn link_to_queue(newsletter: &Newsletter, queue_id: i32, subscriber_id: i32, sent: bool) {
    sqlx::query(&format!(
        "INSERT INTO {} (queue_id, subscriber_id, letter_sent_at) \
         VALUES ($1, $2, CASE WHEN $3 THEN NOW() END)",
        newsletter.config().newsletter.queue_link_table_name()
    ))
    .bind(queue_id)
    .bind(subscriber_id)
    .bind(sent)
    .execute(newsletter.pool())
    .await
    .expect("Failed to link subscriber to queue");
}

async fn insert_customer(newsletter: &Newsletter, firstname: &str, lastname: &str) -> i32 {
    let customer_id: i32 =
        sqlx::query_scalar("INSERT INTO customer_entity (email) VALUES ($1) RETURNING entity_id")
            .bind(format!("{}.{}@example.com", firstname, lastname))
            .fetch_one(newsletter.pool())
            .await
            .expect("Failed to insert customer");

    for (code, value) in [("firstname", firstname), ("lastname", lastname)] {
        let metadata = newsletter
            .attributes()
            .attribute_metadata("customer", code)
            .await
            .expect("Customer name attribute should be installed");

        sqlx::query(&format!(
            "INSERT INTO {} (entity_id, attribute_id, value) VALUES ($1, $2, $3)",
            metadata.attribute_table
        ))
        .bind(customer_id)
        .bind(metadata.attribute_id)
        .bind(value)
        .execute(newsletter.pool())
        .await
        .expect("Failed to insert customer attribute value");
    }

    customer_id
}

#[tokio::test]
async fn test_queue_recipients_are_unsent_with_names() {
    let Some(newsletter) = setup("itq_").await else {
        return;
    };

    let customer_id = insert_customer(&newsletter, "Jane", "Smith").await;
    let guest = insert_subscriber(&newsletter, 1, 0, "guest@example.com", SubscriberStatus::Subscribed).await;
    let customer = insert_subscriber(&newsletter, 1, customer_id, "jane@example.com", SubscriberStatus::Subscribed).await;
    let already_sent = insert_subscriber(&newsletter, 1, 0, "sent@example.com", SubscriberStatus::Subscribed).await;

    link_to_queue(&newsletter, 77, guest, false).await;
    link_to_queue(&newsletter, 77, customer, false).await;
    link_to_queue(&newsletter, 77, already_sent, true).await;

    let mut recipients = newsletter.queue_recipients(77, None).await.unwrap();
    recipients.sort_by_key(|subscriber| subscriber.subscriber_id);

    assert_eq!(recipients.len(), 2);
    assert_eq!(recipients[0].subscriber_id, guest);
    assert_eq!(recipients[0].kind(), SubscriberType::Guest);
    assert_eq!(recipients[0].customer_lastname, None);
    assert_eq!(recipients[1].subscriber_id, customer);
    assert_eq!(recipients[1].kind(), SubscriberType::Customer);
    assert_eq!(recipients[1].customer_lastname.as_deref(), Some("Smith"));
    assert_eq!(recipients[1].customer_firstname.as_deref(), Some("Jane"));

    let unsent = newsletter.subscribers().unwrap().use_queue(77).use_only_unsent();
    assert_eq!(unsent.size(newsletter.pool()).await.unwrap(), 2);

    let linked = newsletter.subscribers().unwrap().use_queue(77);
    assert_eq!(linked.size(newsletter.pool()).await.unwrap(), 3);

    let batch = newsletter.queue_recipients(77, Some(1)).await.unwrap();
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn test_type_column_and_filters() {
    let Some(newsletter) = setup("itt_").await else {
        return;
    };

    let customer_id = insert_customer(&newsletter, "John", "Doe").await;
    let guest = insert_subscriber(&newsletter, 1, 0, "guest@example.com", SubscriberStatus::Subscribed).await;
    let customer = insert_subscriber(&newsletter, 2, customer_id, "john@example.com", SubscriberStatus::Subscribed).await;
    insert_subscriber(&newsletter, 2, 0, "gone@example.com", SubscriberStatus::Unsubscribed).await;

    let typed = newsletter
        .subscribers()
        .unwrap()
        .add_subscriber_type_field()
        .add_order("subscriber_id", SortOrder::Asc)
        .unwrap()
        .use_only_subscribed()
        .load(newsletter.pool())
        .await
        .unwrap();

    assert_eq!(typed.len(), 2);
    assert_eq!(typed[0].subscriber_id, guest);
    assert_eq!(typed[0].subscriber_type, Some(SubscriberType::Guest.code()));
    assert_eq!(typed[1].subscriber_id, customer);
    assert_eq!(typed[1].subscriber_type, Some(SubscriberType::Customer.code()));

    let customers = newsletter.subscribers().unwrap().use_only_customers();
    assert_eq!(customers.size(newsletter.pool()).await.unwrap(), 1);

    let guests = newsletter
        .subscribers()
        .unwrap()
        .add_field_to_filter("type", FieldCondition::Eq(json!(SubscriberType::Guest.code())))
        .unwrap();
    assert_eq!(guests.size(newsletter.pool()).await.unwrap(), 2);

    let in_store_two = newsletter.subscribers().unwrap().add_store_filter(2);
    assert_eq!(in_store_two.size(newsletter.pool()).await.unwrap(), 2);

    let nowhere = newsletter.subscribers().unwrap().add_store_filter(Vec::<i32>::new());
    assert_eq!(nowhere.size(newsletter.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_info_and_grouped_count() {
    let Some(newsletter) = setup("its_").await else {
        return;
    };

    sqlx::query(&format!(
        "INSERT INTO {} (store_id, code, website_id, group_id) VALUES (1, 'default', 1, 1), (2, 'fr', 2, 3)",
        newsletter.config().newsletter.store_table_name()
    ))
    .execute(newsletter.pool())
    .await
    .unwrap();

    insert_subscriber(&newsletter, 1, 0, "a@example.com", SubscriberStatus::Subscribed).await;
    insert_subscriber(&newsletter, 2, 0, "b@example.com", SubscriberStatus::Subscribed).await;
    insert_subscriber(&newsletter, 2, 0, "c@example.com", SubscriberStatus::NotActive).await;

    let french = newsletter
        .subscribers()
        .unwrap()
        .show_store_info()
        .add_field_to_filter("website_id", FieldCondition::Eq(json!(2)))
        .unwrap()
        .load(newsletter.pool())
        .await
        .unwrap();

    assert_eq!(french.len(), 2);
    assert!(french.iter().all(|s| s.website_id == Some(2) && s.group_id == Some(3)));

    let per_store = newsletter
        .subscribers()
        .unwrap()
        .group_by("store_id")
        .unwrap()
        .having(QueryFilter::gt(Expr::count_all(), json!(1)));
    // Counts distinct stores; HAVING is dropped from the count
    assert_eq!(per_store.size(newsletter.pool()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_hex_and_date_like_strings_filter_as_text() {
    let Some(newsletter) = setup("itc_").await else {
        return;
    };

    let confirm_code = "0123456789abcdef0123456789abcdef";
    let confirmed = insert_subscriber(&newsletter, 1, 0, "2024-01-01T00:00:00Z", SubscriberStatus::Unconfirmed).await;
    insert_subscriber(&newsletter, 1, 0, "other@example.com", SubscriberStatus::Unconfirmed).await;

    sqlx::query(&format!(
        "UPDATE {} SET subscriber_confirm_code = $1 WHERE subscriber_id = $2",
        newsletter.config().newsletter.subscriber_table_name()
    ))
    .bind(confirm_code)
    .bind(confirmed)
    .execute(newsletter.pool())
    .await
    .expect("Failed to set confirm code");

    let by_code = newsletter
        .subscribers()
        .unwrap()
        .add_field_to_filter("subscriber_confirm_code", FieldCondition::Eq(json!(confirm_code)))
        .unwrap()
        .load(newsletter.pool())
        .await
        .unwrap();
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].subscriber_id, confirmed);

    let by_email = newsletter
        .subscribers()
        .unwrap()
        .add_field_to_filter("subscriber_email", FieldCondition::Eq(json!("2024-01-01T00:00:00Z")))
        .unwrap();
    assert_eq!(by_email.size(newsletter.pool()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_health_check() {
    let Some(newsletter) = setup("ith_").await else {
        return;
    };
    newsletter.health_check().await.unwrap();
}
