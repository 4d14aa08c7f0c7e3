//! Query builder scenario tests

#[cfg(test)]
mod integration_tests {
    use crate::query_builder::{
        Expr, FieldCondition, JoinClause, QueryFilter, SelectField, SelectStatement, SortOrder,
        MAIN_TABLE,
    };
    use crate::validation::ValidatedTableName;
    use serde_json::{json, Value};
    use std::time::Instant;

    fn table(name: &str) -> ValidatedTableName {
        ValidatedTableName::new(name).unwrap()
    }

    // ========================================
    // Performance Edge Cases
    // ========================================

    #[test]
    fn test_performance_large_in_clause() {
        let start = Instant::now();

        let values: Vec<Value> = (0..1000).map(|i| json!(i)).collect();
        let statement = SelectStatement::new(table("newsletter_subscriber"), MAIN_TABLE)
            .filter(QueryFilter::in_values(Expr::col(MAIN_TABLE, "store_id"), values));

        let (sql, params) = statement.build();
        let duration = start.elapsed();

        assert!(duration.as_millis() < 500);
        assert!(sql.contains("$1000)"));
        assert_eq!(params.len(), 1000);
    }

    #[test]
    fn test_performance_deep_nesting() {
        let mut filter = QueryFilter::eq(Expr::col(MAIN_TABLE, "store_id"), json!(0));

        for i in 0..50 {
            filter = QueryFilter::and(vec![
                filter,
                QueryFilter::eq(Expr::col(MAIN_TABLE, "customer_id"), json!(i)),
            ]);
        }

        let (sql, params) = SelectStatement::new(table("newsletter_subscriber"), MAIN_TABLE)
            .filter(filter)
            .build();

        assert!(sql.contains("$51"));
        assert_eq!(params.len(), 51);
    }

    // ========================================
    // Real-World Scenario Tests
    // ========================================

    #[test]
    fn test_customer_attribute_lookup_query() {
        // Two left joins onto the same attribute-value table under different aliases
        let mut statement = SelectStatement::new(table("newsletter_subscriber"), MAIN_TABLE);

        for (alias, attribute_id, column) in [
            ("customer_lastname_table", 7, "customer_lastname"),
            ("customer_firstname_table", 5, "customer_firstname"),
        ] {
            statement = statement.join(
                JoinClause::left(table("customer_entity_varchar"), alias)
                    .on(QueryFilter::equals(
                        Expr::col(alias, "entity_id"),
                        Expr::col(MAIN_TABLE, "customer_id"),
                    ))
                    .on(QueryFilter::equals(
                        Expr::col(alias, "attribute_id"),
                        Expr::int(attribute_id),
                    )),
                vec![SelectField::expr_as(Expr::col(alias, "value"), column)],
            );
        }

        let filter = FieldCondition::Like("Sm%".to_string())
            .into_filter(
                "customer_lastname",
                Expr::col("customer_lastname_table", "value"),
            )
            .unwrap();

        let (sql, params) = statement
            .filter(filter)
            .order(Expr::col("customer_lastname_table", "value"), SortOrder::Asc)
            .build();

        assert_eq!(
            sql,
            "SELECT main_table.*, customer_lastname_table.value AS customer_lastname, \
             customer_firstname_table.value AS customer_firstname \
             FROM newsletter_subscriber AS main_table \
             LEFT JOIN customer_entity_varchar AS customer_lastname_table \
             ON customer_lastname_table.entity_id = main_table.customer_id \
             AND customer_lastname_table.attribute_id = 7 \
             LEFT JOIN customer_entity_varchar AS customer_firstname_table \
             ON customer_firstname_table.entity_id = main_table.customer_id \
             AND customer_firstname_table.attribute_id = 5 \
             WHERE customer_lastname_table.value LIKE $1 \
             ORDER BY customer_lastname_table.value ASC"
        );
        assert_eq!(params, vec![json!("Sm%")]);
    }

    #[test]
    fn test_date_range_report_query() {
        let filter = FieldCondition::Range {
            from: Some(json!("2024-01-01T00:00:00Z")),
            to: Some(json!("2024-12-31T23:59:59Z")),
        }
        .into_filter("change_status_at", Expr::col(MAIN_TABLE, "change_status_at"))
        .unwrap();

        let (sql, params) = SelectStatement::new(table("newsletter_subscriber"), MAIN_TABLE)
            .filter(filter)
            .build();

        assert!(sql.ends_with(
            "WHERE (main_table.change_status_at >= $1 AND main_table.change_status_at <= $2)"
        ));
        assert_eq!(params.len(), 2);
    }
}
