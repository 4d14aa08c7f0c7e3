//! Logical field names mapped to SQL expressions
//!
//! A collection built over several joined tables exposes some fields under
//! names that are not plain `main_table` columns. The map is filled once when
//! the collection is created and is read-only afterwards.

use crate::query_builder::expression::{ColumnRef, Expr, MAIN_TABLE};
use crate::validation::ValidationError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: HashMap<String, Expr>,
}

impl FieldMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        Self {
            fields: entries
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        }
    }

    /// Mapped expression for `name`, if any
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Expression a filter on `name` should use.
    ///
    /// Mapped names win. Anything else must be a valid column reference;
    /// unqualified columns belong to the main table.
    pub fn resolve(&self, name: &str) -> Result<Expr, ValidationError> {
        if let Some(expr) = self.fields.get(name) {
            return Ok(expr.clone());
        }

        let column = ColumnRef::parse(name)?.qualified_with(MAIN_TABLE);
        Ok(Expr::Column(column))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> FieldMap {
        FieldMap::new([
            ("website_id", Expr::col("store", "website_id")),
            ("customer_lastname", Expr::col("customer_lastname_table", "value")),
        ])
    }

    #[test]
    fn test_mapped_field_resolves_to_mapping() {
        assert_eq!(
            map().resolve("website_id").unwrap(),
            Expr::col("store", "website_id")
        );
    }

    #[test]
    fn test_unmapped_bare_field_belongs_to_main_table() {
        assert_eq!(
            map().resolve("subscriber_email").unwrap(),
            Expr::col(MAIN_TABLE, "subscriber_email")
        );
    }

    #[test]
    fn test_unmapped_qualified_field_is_kept() {
        assert_eq!(
            map().resolve("link.letter_sent_at").unwrap(),
            Expr::col("link", "letter_sent_at")
        );
    }

    #[test]
    fn test_invalid_field_is_rejected() {
        assert!(map().resolve("email; DROP TABLE store").is_err());
        assert!(map().resolve("").is_err());
    }

    #[test]
    fn test_every_mapped_name_resolves() {
        let map = map();
        assert_eq!(map.len(), 2);
        for name in map.names() {
            assert!(map.resolve(name).is_ok(), "{}", name);
        }
    }
}
