use super::expression::Expr;

/// One entry of the SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// `alias.*`
    AllOf(String),
    /// `expr` or `expr AS alias`
    Expr { expr: Expr, alias: Option<String> },
}

impl SelectField {
    pub fn all_of(table_alias: impl Into<String>) -> Self {
        SelectField::AllOf(table_alias.into())
    }

    pub fn expr(expr: Expr) -> Self {
        SelectField::Expr { expr, alias: None }
    }

    pub fn expr_as(expr: Expr, alias: impl Into<String>) -> Self {
        SelectField::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }

    /// Name the column comes back under, if it has one
    pub fn output_name(&self) -> Option<&str> {
        match self {
            SelectField::AllOf(_) => None,
            SelectField::Expr {
                alias: Some(alias), ..
            } => Some(alias),
            SelectField::Expr { expr, alias: None } => {
                expr.as_column().map(|column| column.column.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(SelectField::all_of("main_table").output_name(), None);
        assert_eq!(
            SelectField::expr(Expr::col("store", "website_id")).output_name(),
            Some("website_id")
        );
        assert_eq!(
            SelectField::expr_as(Expr::col("customer_lastname_table", "value"), "customer_lastname")
                .output_name(),
            Some("customer_lastname")
        );
        assert_eq!(SelectField::expr(Expr::count_all()).output_name(), None);
    }
}
