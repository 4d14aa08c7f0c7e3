//! Generic record collection
//!
//! A collection owns one [`SelectStatement`] over a main table (aliased
//! `main_table`) plus the paging state, and executes it against a pool,
//! hydrating rows into `T`.

use crate::errors::CollectionError;
use crate::field_map::FieldMap;
use crate::query_builder::{
    Expr, FieldCondition, Pagination, QueryFilter, SelectStatement, SortOrder, MAIN_TABLE,
};
use crate::validation::ValidatedTableName;
use crate::DbPool;
use serde_json::Value;
use sqlx::Row;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct GenericCollection<T> {
    select: SelectStatement,
    field_map: Arc<FieldMap>,
    page_size: Option<i64>,
    cur_page: i64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for GenericCollection<T> {
    fn clone(&self) -> Self {
        Self {
            select: self.select.clone(),
            field_map: Arc::clone(&self.field_map),
            page_size: self.page_size,
            cur_page: self.cur_page,
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for GenericCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericCollection")
            .field("table", &self.select.table())
            .field("joins", &self.select.joins().len())
            .field("conditions", &self.select.conditions().len())
            .field("page_size", &self.page_size)
            .field("cur_page", &self.cur_page)
            .finish()
    }
}

impl<T> GenericCollection<T> {
    pub fn new(main_table: ValidatedTableName, field_map: Arc<FieldMap>) -> Self {
        Self {
            select: SelectStatement::new(main_table, MAIN_TABLE),
            field_map,
            page_size: None,
            cur_page: 1,
            _phantom: PhantomData,
        }
    }

    pub fn main_table(&self) -> &ValidatedTableName {
        self.select.table()
    }

    /// The statement without paging applied
    pub fn select(&self) -> &SelectStatement {
        &self.select
    }

    /// Apply a change to the underlying statement
    pub fn map_select(mut self, f: impl FnOnce(SelectStatement) -> SelectStatement) -> Self {
        self.select = f(self.select);
        self
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// Expression a logical field name stands for
    pub fn mapped_field(&self, field: &str) -> Result<Expr, CollectionError> {
        Ok(self.field_map.resolve(field)?)
    }

    /// Filter on a logical field name; mapped names use their expression
    pub fn add_field_to_filter(
        self,
        field: &str,
        condition: FieldCondition,
    ) -> Result<Self, CollectionError> {
        let expr = self.mapped_field(field)?;
        let filter = condition.into_filter(field, expr)?;
        Ok(self.add_filter(filter))
    }

    /// Add an already-built WHERE predicate
    pub fn add_filter(self, filter: QueryFilter) -> Self {
        self.map_select(|select| select.filter(filter))
    }

    pub fn add_order(self, field: &str, order: SortOrder) -> Result<Self, CollectionError> {
        let expr = self.mapped_field(field)?;
        Ok(self.map_select(|select| select.order(expr, order)))
    }

    pub fn group_by(self, field: &str) -> Result<Self, CollectionError> {
        let expr = self.mapped_field(field)?;
        Ok(self.map_select(|select| select.group(expr)))
    }

    pub fn having(self, filter: QueryFilter) -> Self {
        self.map_select(|select| select.having(filter))
    }

    /// Rows per page. Negative sizes are treated as 0.
    pub fn set_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size.max(0));
        self
    }

    /// 1-based page number, used together with the page size
    pub fn set_cur_page(mut self, page: i64) -> Self {
        self.cur_page = page.max(1);
        self
    }

    pub fn page_size(&self) -> Option<i64> {
        self.page_size
    }

    pub fn cur_page(&self) -> i64 {
        self.cur_page
    }

    fn paged_select(&self) -> SelectStatement {
        match self.page_size {
            Some(page_size) => self
                .select
                .clone()
                .paginate(Pagination::page(page_size, self.cur_page)),
            None => self.select.clone(),
        }
    }

    /// SQL and values for loading the current page
    pub fn select_sql(&self) -> (String, Vec<Value>) {
        self.paged_select().build()
    }

    /// SQL and values counting every row the collection matches
    pub fn select_count_sql(&self) -> (String, Vec<Value>) {
        self.select.count_statement().build()
    }
}

// Shared parameter binding logic
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            // Strings always bind as text, whatever they look like
            serde_json::Value::String(s) => $query.bind(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        $query.bind(i as i32)
                    } else {
                        $query.bind(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            serde_json::Value::Bool(b) => $query.bind(b),
            serde_json::Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(other.to_string()),
        }
    };
}

impl<T> GenericCollection<T>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    /// Execute the statement and hydrate the current page
    pub async fn load(&self, pool: &DbPool) -> Result<Vec<T>, CollectionError> {
        let (sql, params) = self.select_sql();
        #[cfg(feature = "debug-logging")]
        tracing::debug!(table = %self.main_table(), %sql, params = params.len(), "loading collection");

        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            query = bind_json_param!(query, param);
        }

        query
            .fetch_all(pool)
            .await
            .map_err(|e| CollectionError::database(self.main_table().as_str(), "load", e))
    }

    /// Number of rows matched, ignoring paging
    pub async fn size(&self, pool: &DbPool) -> Result<i64, CollectionError> {
        let (sql, params) = self.select_count_sql();
        #[cfg(feature = "debug-logging")]
        tracing::debug!(table = %self.main_table(), %sql, params = params.len(), "counting collection");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_json_param!(query, param);
        }

        let row = query
            .fetch_one(pool)
            .await
            .map_err(|e| CollectionError::database(self.main_table().as_str(), "size", e))?;

        row.try_get::<i64, _>(0)
            .map_err(|e| CollectionError::database(self.main_table().as_str(), "size", e))
    }
}
