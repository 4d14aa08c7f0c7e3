use super::filter::QueryFilter;
use crate::validation::ValidatedTableName;

/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN - only rows with a match on both sides
    Inner,
    /// LEFT JOIN - every left row, NULLs where the right side has no match
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Represents a complete JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: ValidatedTableName,
    /// Correlation name used by every column reference into this table
    pub alias: String,
    /// ON predicates, combined with AND
    pub on: Vec<QueryFilter>,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: ValidatedTableName, alias: impl Into<String>) -> Self {
        Self {
            join_type,
            table,
            alias: alias.into(),
            on: Vec::new(),
        }
    }

    pub fn inner(table: ValidatedTableName, alias: impl Into<String>) -> Self {
        Self::new(JoinType::Inner, table, alias)
    }

    pub fn left(table: ValidatedTableName, alias: impl Into<String>) -> Self {
        Self::new(JoinType::Left, table, alias)
    }

    /// Add an ON predicate
    pub fn on(mut self, condition: QueryFilter) -> Self {
        self.on.push(condition);
        self
    }

    pub fn table_ref(&self) -> &str {
        &self.alias
    }
}
