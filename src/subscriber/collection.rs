//! Subscriber query composer
//!
//! Wraps a [`GenericCollection`] over the subscriber table and adds the
//! newsletter-specific joins and filters: queue linkage, customer names
//! resolved through attribute metadata, and store information.

use crate::errors::NewsletterError;
use crate::subscriber::{QueueId, StoreIds, Subscriber, SubscriberStatus, SubscriberType};
use config::NewsletterConfig;
use db_collection::query_builder::{
    Expr, FieldCondition, JoinClause, QueryFilter, QueryOperator, SelectField, SelectStatement,
    SortOrder, MAIN_TABLE,
};
use db_collection::{CollectionError, DbPool, FieldMap, GenericCollection, ValidatedTableName};
use eav::AttributeMetadataProvider;
use serde_json::{json, Value};
use std::sync::Arc;

/// Alias of the joined queue-link table
pub const LINK_ALIAS: &str = "link";
/// Alias of the joined store table
pub const STORE_ALIAS: &str = "store";
/// Alias of the joined customer last name values
pub const LASTNAME_ALIAS: &str = "customer_lastname_table";
/// Alias of the joined customer first name values
pub const FIRSTNAME_ALIAS: &str = "customer_firstname_table";

/// `CASE WHEN main_table.customer_id = 0 THEN 1 ELSE 2 END`
pub fn subscriber_type_expr() -> Expr {
    Expr::case_when(
        QueryFilter::equals(Expr::col(MAIN_TABLE, "customer_id"), Expr::int(0)),
        Expr::int(SubscriberType::Guest.code() as i64),
        Expr::int(SubscriberType::Customer.code() as i64),
    )
}

fn subscriber_field_map() -> FieldMap {
    FieldMap::new([
        ("customer_lastname", Expr::col(LASTNAME_ALIAS, "value")),
        ("customer_firstname", Expr::col(FIRSTNAME_ALIAS, "value")),
        ("type", subscriber_type_expr()),
        ("website_id", Expr::col(STORE_ALIAS, "website_id")),
        ("group_id", Expr::col(STORE_ALIAS, "group_id")),
        ("store_id", Expr::col(MAIN_TABLE, "store_id")),
    ])
}

#[derive(Debug, Clone)]
pub struct SubscriberCollection {
    inner: GenericCollection<Subscriber>,
    queue_link_table: ValidatedTableName,
    store_table: ValidatedTableName,
    customer_entity_type: String,
    queue_joined: bool,
}

impl SubscriberCollection {
    /// Collection over the configured tables, table prefix applied
    pub fn new(
        config: &NewsletterConfig,
        customer_entity_type: &str,
    ) -> Result<Self, CollectionError> {
        let subscriber_table = ValidatedTableName::new(&config.subscriber_table_name())?;

        Ok(Self {
            inner: GenericCollection::new(subscriber_table, Arc::new(subscriber_field_map())),
            queue_link_table: ValidatedTableName::new(&config.queue_link_table_name())?,
            store_table: ValidatedTableName::new(&config.store_table_name())?,
            customer_entity_type: customer_entity_type.to_string(),
            queue_joined: false,
        })
    }

    fn map_inner(
        mut self,
        f: impl FnOnce(GenericCollection<Subscriber>) -> GenericCollection<Subscriber>,
    ) -> Self {
        self.inner = f(self.inner);
        self
    }

    fn map_select(self, f: impl FnOnce(SelectStatement) -> SelectStatement) -> Self {
        self.map_inner(|inner| inner.map_select(f))
    }

    /// Add a WHERE condition unless an identical one is already present
    fn filter_once(self, filter: QueryFilter) -> Self {
        self.map_select(|select| {
            if select.has_condition(&filter) {
                select
            } else {
                select.filter(filter)
            }
        })
    }

    /// Restrict to subscribers linked to `queue_id`
    pub fn use_queue(self, queue_id: impl Into<QueueId>) -> Self {
        let QueueId(queue_id) = queue_id.into();

        let join = JoinClause::inner(self.queue_link_table.clone(), LINK_ALIAS).on(
            QueryFilter::equals(
                Expr::col(LINK_ALIAS, "subscriber_id"),
                Expr::col(MAIN_TABLE, "subscriber_id"),
            ),
        );

        let mut collection = self
            .map_select(|select| select.join(join, Vec::new()))
            .filter_once(QueryFilter::eq(Expr::col(LINK_ALIAS, "queue_id"), json!(queue_id)));
        collection.queue_joined = true;
        collection
    }

    /// Only links whose letter has not been sent. Needs [`Self::use_queue`] first.
    pub fn use_only_unsent(self) -> Self {
        if !self.queue_joined {
            return self;
        }
        self.filter_once(QueryFilter::is_null(Expr::col(LINK_ALIAS, "letter_sent_at")))
    }

    /// Join customer last and first names
    pub async fn show_customer_info(
        self,
        attributes: &dyn AttributeMetadataProvider,
    ) -> Result<Self, NewsletterError> {
        let lastname = attributes
            .attribute_metadata(&self.customer_entity_type, "lastname")
            .await?;
        let firstname = attributes
            .attribute_metadata(&self.customer_entity_type, "firstname")
            .await?;

        let mut collection = self;
        for (alias, output, metadata) in [
            (LASTNAME_ALIAS, "customer_lastname", lastname),
            (FIRSTNAME_ALIAS, "customer_firstname", firstname),
        ] {
            crate::trace_log!(
                attribute_code = %metadata.attribute_code,
                attribute_id = metadata.attribute_id,
                table = %metadata.attribute_table,
                "joining customer attribute"
            );
            let join = JoinClause::left(metadata.attribute_table, alias)
                .on(QueryFilter::equals(
                    Expr::col(alias, "entity_id"),
                    Expr::col(MAIN_TABLE, "customer_id"),
                ))
                .on(QueryFilter::equals(
                    Expr::col(alias, "attribute_id"),
                    Expr::int(metadata.attribute_id as i64),
                ));
            let columns = vec![SelectField::expr_as(Expr::col(alias, "value"), output)];

            collection = collection.map_select(|select| select.join(join, columns));
        }

        Ok(collection)
    }

    /// Project the `type` column (1 guest, 2 customer)
    pub fn add_subscriber_type_field(self) -> Self {
        self.map_select(|select| {
            if select
                .columns()
                .iter()
                .any(|column| column.output_name() == Some("type"))
            {
                return select;
            }
            select.column(SelectField::expr_as(subscriber_type_expr(), "type"))
        })
    }

    /// Join the store table for `group_id` and `website_id`
    pub fn show_store_info(self) -> Self {
        let join = JoinClause::inner(self.store_table.clone(), STORE_ALIAS).on(
            QueryFilter::equals(
                Expr::col(STORE_ALIAS, "store_id"),
                Expr::col(MAIN_TABLE, "store_id"),
            ),
        );
        let columns = vec![
            SelectField::expr(Expr::col(STORE_ALIAS, "group_id")),
            SelectField::expr(Expr::col(STORE_ALIAS, "website_id")),
        ];

        self.map_select(|select| select.join(join, columns))
    }

    /// Only subscribers with a customer account
    pub fn use_only_customers(self) -> Self {
        self.filter_once(QueryFilter::compare(
            Expr::col(MAIN_TABLE, "customer_id"),
            QueryOperator::Gt,
            Expr::int(0),
        ))
    }

    /// Only subscribers with the subscribed status
    pub fn use_only_subscribed(self) -> Self {
        self.filter_once(QueryFilter::eq(
            Expr::col(MAIN_TABLE, "subscriber_status"),
            json!(SubscriberStatus::Subscribed.code()),
        ))
    }

    /// Restrict to one or more stores. No ids matches nothing.
    pub fn add_store_filter(self, store_ids: impl Into<StoreIds>) -> Self {
        let StoreIds(ids) = store_ids.into();
        let values = ids.into_iter().map(Value::from).collect();

        self.map_select(|select| {
            select.filter(QueryFilter::in_values(Expr::col(MAIN_TABLE, "store_id"), values))
        })
    }

    /// True once [`Self::use_queue`] joined the queue-link table
    pub fn queue_joined_flag(&self) -> bool {
        self.queue_joined
    }

    /// Filter on a logical field; `type`, store and customer name fields are mapped
    pub fn add_field_to_filter(
        self,
        field: &str,
        condition: FieldCondition,
    ) -> Result<Self, CollectionError> {
        let inner = self.inner.add_field_to_filter(field, condition)?;
        Ok(Self { inner, ..self })
    }

    /// Order by a logical field
    pub fn add_order(self, field: &str, order: SortOrder) -> Result<Self, CollectionError> {
        let inner = self.inner.add_order(field, order)?;
        Ok(Self { inner, ..self })
    }

    /// Group by a logical field
    pub fn group_by(self, field: &str) -> Result<Self, CollectionError> {
        let inner = self.inner.group_by(field)?;
        Ok(Self { inner, ..self })
    }

    /// Add a HAVING condition
    pub fn having(self, filter: QueryFilter) -> Self {
        self.map_inner(|inner| inner.having(filter))
    }

    /// Rows per page
    pub fn set_page_size(self, page_size: i64) -> Self {
        self.map_inner(|inner| inner.set_page_size(page_size))
    }

    /// 1-based page number
    pub fn set_cur_page(self, page: i64) -> Self {
        self.map_inner(|inner| inner.set_cur_page(page))
    }

    /// The composed statement without paging
    pub fn select(&self) -> &SelectStatement {
        self.inner.select()
    }

    pub fn collection(&self) -> &GenericCollection<Subscriber> {
        &self.inner
    }

    /// SQL and values for loading the current page
    pub fn select_sql(&self) -> (String, Vec<Value>) {
        self.inner.select_sql()
    }

    /// Count SQL: ordering, paging, projections and HAVING removed
    pub fn select_count_sql(&self) -> (String, Vec<Value>) {
        self.inner.select_count_sql()
    }

    /// Load the current page of subscribers
    pub async fn load(&self, pool: &DbPool) -> Result<Vec<Subscriber>, CollectionError> {
        self.inner.load(pool).await
    }

    /// Number of matching subscribers, ignoring paging
    pub async fn size(&self, pool: &DbPool) -> Result<i64, CollectionError> {
        self.inner.size(pool).await
    }
}
