//! Typed SQL expressions
//!
//! Expressions are plain values. They are turned into SQL by
//! [`SqlGenerator`](super::sql_generation::SqlGenerator) and can be evaluated
//! in memory against a row with [`Expr::evaluate`](super::evaluate).

use crate::query_builder::filter::QueryFilter;
use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

/// Alias the collection gives its own table
pub const MAIN_TABLE: &str = "main_table";

/// Reference to a column, optionally qualified by a table alias
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    /// Qualified reference from trusted, statically known identifiers
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Unqualified reference from a trusted identifier
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Parse `column` or `alias.column`, validating each identifier
    pub fn parse(reference: &str) -> Result<Self, ValidationError> {
        let mut parts = reference.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(column), None, None) => {
                let column = ValidatedFieldName::new(column)?;
                Ok(Self::bare(column.into_string()))
            }
            (Some(table), Some(column), None) => {
                let table = ValidatedTableName::new(table)?;
                let column = ValidatedFieldName::new(column)?;
                Ok(Self::new(table.into_string(), column.into_string()))
            }
            _ => Err(ValidationError::MalformedReference(reference.to_string())),
        }
    }

    /// Qualify an unqualified reference with `table`
    pub fn qualified_with(self, table: &str) -> Self {
        match self.table {
            Some(_) => self,
            None => Self::new(table, self.column),
        }
    }

    pub fn to_sql(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }
}

/// Literals rendered inline. Only types that cannot carry SQL are allowed
/// here; everything else is bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn to_sql(&self) -> String {
        match self {
            Literal::Int(value) => value.to_string(),
            Literal::Bool(true) => "TRUE".to_string(),
            Literal::Bool(false) => "FALSE".to_string(),
            Literal::Null => "NULL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    /// `CASE WHEN <when> THEN <then> ELSE <otherwise> END`
    Case {
        when: Box<QueryFilter>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `COUNT(*)` when `args` is empty, `COUNT(DISTINCT ...)` when `distinct`
    Count { distinct: bool, args: Vec<Expr> },
}

impl Expr {
    pub fn col(table: &str, column: &str) -> Self {
        Expr::Column(ColumnRef::new(table, column))
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    /// Conditional expression, the typed form of an if/then/else check
    pub fn case_when(when: QueryFilter, then: Expr, otherwise: Expr) -> Self {
        Expr::Case {
            when: Box::new(when),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn count_all() -> Self {
        Expr::Count {
            distinct: false,
            args: Vec::new(),
        }
    }

    pub fn count_distinct(args: Vec<Expr>) -> Self {
        Expr::Count {
            distinct: true,
            args,
        }
    }

    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Expr::Column(column) => Some(column),
            _ => None,
        }
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::Column(column)
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified_reference() {
        let column = ColumnRef::parse("link.letter_sent_at").unwrap();
        assert_eq!(column, ColumnRef::new("link", "letter_sent_at"));
        assert_eq!(column.to_sql(), "link.letter_sent_at");
    }

    #[test]
    fn test_parse_bare_reference_and_qualify() {
        let column = ColumnRef::parse("subscriber_email").unwrap();
        assert_eq!(column.table, None);
        assert_eq!(
            column.qualified_with(MAIN_TABLE).to_sql(),
            "main_table.subscriber_email"
        );
    }

    #[test]
    fn test_parse_rejects_malformed_references() {
        assert_eq!(
            ColumnRef::parse("a.b.c").unwrap_err(),
            ValidationError::MalformedReference("a.b.c".to_string())
        );
        assert!(ColumnRef::parse("main_table.").is_err());
        assert!(ColumnRef::parse("main_table.id OR 1=1").is_err());
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Literal::Int(-3).to_sql(), "-3");
        assert_eq!(Literal::Bool(true).to_sql(), "TRUE");
        assert_eq!(Literal::Null.to_sql(), "NULL");
    }
}
