//! SELECT statement value
//!
//! Every mutator consumes the statement and returns the updated value, so a
//! clone taken before a change never observes it.

use crate::query_builder::expression::Expr;
use crate::query_builder::filter::QueryFilter;
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::join::JoinClause;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::select::SelectField;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::validation::ValidatedTableName;
use serde_json::Value;

/// Parts of a statement that can be cleared with [`SelectStatement::reset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPart {
    Columns,
    Where,
    Group,
    Having,
    Order,
    LimitCount,
    LimitOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub(crate) table: ValidatedTableName,
    pub(crate) alias: String,
    pub(crate) columns: Vec<SelectField>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) group_by: GroupBy,
    pub(crate) order_by: Vec<(Expr, SortOrder)>,
    pub(crate) pagination: Pagination,
}

impl SelectStatement {
    /// `SELECT alias.* FROM table AS alias`
    pub fn new(table: ValidatedTableName, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            table,
            columns: vec![SelectField::all_of(alias.clone())],
            alias,
            joins: Vec::new(),
            conditions: Vec::new(),
            group_by: GroupBy::default(),
            order_by: Vec::new(),
            pagination: Pagination::new(),
        }
    }

    pub fn table(&self) -> &ValidatedTableName {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn columns(&self) -> &[SelectField] {
        &self.columns
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    pub fn group_by(&self) -> &GroupBy {
        &self.group_by
    }

    pub fn order_by(&self) -> &[(Expr, SortOrder)] {
        &self.order_by
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// True if `alias` already names the main table or a joined table
    pub fn has_alias(&self, alias: &str) -> bool {
        self.alias == alias || self.has_join(alias)
    }

    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|join| join.alias == alias)
    }

    pub fn has_condition(&self, filter: &QueryFilter) -> bool {
        self.conditions.contains(filter)
    }

    /// Append a projected column
    pub fn column(mut self, field: SelectField) -> Self {
        self.columns.push(field);
        self
    }

    /// Add a join and the columns it contributes. A join whose alias is
    /// already taken is skipped together with its columns.
    pub fn join(mut self, join: JoinClause, columns: Vec<SelectField>) -> Self {
        if self.has_alias(&join.alias) {
            #[cfg(feature = "debug-logging")]
            tracing::debug!(
                alias = %join.alias,
                table = %join.table,
                "skipping join, alias already present"
            );
            return self;
        }

        self.joins.push(join);
        self.columns.extend(columns);
        self
    }

    /// Add a WHERE condition (combined with AND)
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    pub fn group(mut self, field: Expr) -> Self {
        self.group_by.fields.push(field);
        self
    }

    pub fn having(mut self, filter: QueryFilter) -> Self {
        self.group_by = self.group_by.having(filter);
        self
    }

    pub fn order(mut self, field: Expr, order: SortOrder) -> Self {
        self.order_by.push((field, order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Clear one part of the statement
    pub fn reset(mut self, part: SelectPart) -> Self {
        match part {
            SelectPart::Columns => self.columns.clear(),
            SelectPart::Where => self.conditions.clear(),
            SelectPart::Group => self.group_by.fields.clear(),
            SelectPart::Having => self.group_by.having.clear(),
            SelectPart::Order => self.order_by.clear(),
            SelectPart::LimitCount => self.pagination.limit = None,
            SelectPart::LimitOffset => self.pagination.offset = None,
        }
        self
    }

    /// Statement counting the rows this statement selects.
    ///
    /// Ordering, paging, projections and HAVING are dropped. A grouped
    /// statement counts distinct group keys instead of rows.
    pub fn count_statement(&self) -> Self {
        let group_fields = self.group_by.fields.clone();

        let count = self
            .clone()
            .reset(SelectPart::Order)
            .reset(SelectPart::LimitCount)
            .reset(SelectPart::LimitOffset)
            .reset(SelectPart::Columns)
            .reset(SelectPart::Having);

        if group_fields.is_empty() {
            count.column(SelectField::expr(Expr::count_all()))
        } else {
            count
                .reset(SelectPart::Group)
                .column(SelectField::expr(Expr::count_distinct(group_fields)))
        }
    }

    /// Render SQL and the values for its `$n` placeholders
    pub fn build(&self) -> (String, Vec<Value>) {
        SqlGenerator::build_select(self)
    }
}
