use super::expression::Expr;
use super::filter::QueryFilter;

/// GROUP BY expressions and the HAVING predicates applied to the groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBy {
    pub fields: Vec<Expr>,
    pub having: Vec<QueryFilter>,
}

impl GroupBy {
    pub fn new(fields: Vec<Expr>) -> Self {
        Self {
            fields,
            having: Vec::new(),
        }
    }

    /// Add a single HAVING condition
    pub fn having(mut self, condition: QueryFilter) -> Self {
        self.having.push(condition);
        self
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn has_having(&self) -> bool {
        !self.having.is_empty()
    }
}
