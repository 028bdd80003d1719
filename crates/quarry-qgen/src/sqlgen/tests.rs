use super::*;
use crate::fixtures::{PAYMENTS_QUERY, PAYMENTS_SQL, make_test_schema};
use crate::{ErrorClass, QErrorKind, QueryPlanner, parse_graph_query, parse_rest_params};
use facet_testhelpers::test;
use quarry_query_schema::QueryPlan;

fn rest_plan(entity: &str, params: &[(&str, &str)]) -> QueryPlan {
    let schema = make_test_schema();
    let model = parse_rest_params(params.iter().map(|(k, v)| (*k, Some(*v))));
    QueryPlanner::new(&schema).plan_rest(&model, entity).unwrap()
}

fn rest_sql(entity: &str, params: &[(&str, &str)]) -> String {
    let plan = rest_plan(entity, params);
    generate_plan_sql(&SqlGenContext::new(), &plan).unwrap().sql
}

fn graph_sql(source: &str) -> String {
    generate_graph_sql(&parse_graph_query(source).unwrap())
        .unwrap()
        .sql
}

// ============================================================================
// Declarative input
// ============================================================================

#[test]
fn payments_query_renders_exactly() {
    let model = parse_graph_query(PAYMENTS_QUERY).unwrap();
    let generated = generate_graph_sql(&model).unwrap();
    assert_eq!(generated.sql, PAYMENTS_SQL);
    assert_eq!(
        generated
            .columns
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>(),
        [
            "currencyCode",
            "paymentSum",
            "rate",
            "status",
            "sum_paymentSum",
            "sum_rate",
            "total_count"
        ]
    );
}

#[test]
fn payments_plan_renders_the_same_sql() {
    let schema = make_test_schema();
    let model = parse_graph_query(PAYMENTS_QUERY).unwrap();
    let plan = QueryPlanner::new(&schema).plan_graph(&model).unwrap();

    let ctx = SqlGenContext::for_entity(&schema, "payments");
    assert!(ctx.table.is_some());
    assert_eq!(generate_plan_sql(&ctx, &plan).unwrap().sql, PAYMENTS_SQL);
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(graph_sql(PAYMENTS_QUERY), graph_sql(PAYMENTS_QUERY));
}

#[test]
fn minimal_query() {
    insta::assert_snapshot!(graph_sql("{ payments { id } }"), @"SELECT id FROM payments");
}

#[test]
fn boolean_and_negative_literals() {
    let sql = graph_sql(
        "{ audit_log(where: { active: { eq: TRUE }, delta: { lt: -3.50 } }) { id } }",
    );
    insta::assert_snapshot!(sql, @"SELECT id FROM audit_log WHERE active = true AND delta < -3.50");
}

#[test]
fn all_aggregates_in_order() {
    let sql = graph_sql("{ payments(max: [rate], min: [rate], avg: [rate], sum: [rate]) { id } }");
    insta::assert_snapshot!(sql, @"SELECT id, SUM(rate) AS sum_rate, AVG(rate) AS avg_rate, MIN(rate) AS min_rate, MAX(rate) AS max_rate FROM payments");
}

#[test]
fn page_without_size_adds_nothing() {
    let sql = graph_sql("{ payments(pagination: { page: 4 }) { id } }");
    insta::assert_snapshot!(sql, @"SELECT id FROM payments");
}

#[test]
fn size_without_page_limits_only() {
    let sql = graph_sql("{ payments(pagination: { pageSize: 5 }) { id } }");
    insta::assert_snapshot!(sql, @"SELECT id FROM payments LIMIT 5");
}

// ============================================================================
// REST input
// ============================================================================

#[test]
fn rest_query_with_between_sorting_and_paging() {
    let sql = rest_sql(
        "payments",
        &[
            ("attributes", "id,status"),
            ("status", "PAID"),
            ("paymentSum", "10..20"),
            ("sorting", "-id"),
            ("page", "2"),
            ("pageSize", "10"),
        ],
    );
    insta::assert_snapshot!(sql, @"SELECT id, status FROM payments WHERE status = 'PAID' AND paymentSum BETWEEN 10 AND 20 ORDER BY id DESC LIMIT 10 OFFSET 10");
}

#[test]
fn rest_comparison_operators() {
    let sql = rest_sql(
        "payments",
        &[
            ("userId", ">5"),
            ("rate", "<=3"),
            ("status", "!=NEW"),
            ("userName", "%smith"),
            ("paymentSum", "<100"),
        ],
    );
    insta::assert_snapshot!(sql, @"SELECT * FROM payments WHERE userId > 5 AND rate <= 3 AND status != 'NEW' AND userName LIKE '%smith' AND paymentSum < 100");
}

#[test]
fn rest_ignore_case_wraps_every_operand() {
    let sql = rest_sql(
        "payments",
        &[("userName", "^a..m"), ("userEmail", "^Bob@Example.com")],
    );
    insta::assert_snapshot!(sql, @"SELECT * FROM payments WHERE LOWER(userName) BETWEEN LOWER('a') AND LOWER('m') AND LOWER(userEmail) = LOWER('Bob@Example.com')");
}

#[test]
fn rest_digit_separators_render_as_strings() {
    let sql = rest_sql(
        "payments",
        &[("userName", "12_34"), ("paymentSum", ">=1_000")],
    );
    insta::assert_snapshot!(sql, @"SELECT * FROM payments WHERE userName LIKE '12_34' AND paymentSum >= '1_000'");
}

#[test]
fn rest_long_fractions_are_not_rounded() {
    let sql = rest_sql("payments", &[("rate", "0.12345678901234567890123456789012")]);
    insta::assert_snapshot!(sql, @"SELECT * FROM payments WHERE rate = '0.12345678901234567890123456789012'");
}

#[test]
fn rest_string_literals_are_escaped() {
    let sql = rest_sql("payments", &[("userName", "O'Brien")]);
    insta::assert_snapshot!(sql, @"SELECT * FROM payments WHERE userName = 'O''Brien'");
}

#[test]
fn rest_page_zero_is_first_page() {
    let sql = rest_sql("payments", &[("page", "0"), ("pageSize", "5")]);
    insta::assert_snapshot!(sql, @"SELECT * FROM payments LIMIT 5 OFFSET 0");
}

#[test]
fn rest_without_entities_keeps_aggregates() {
    let sql = rest_sql(
        "payments",
        &[
            ("attributes", "id"),
            ("entities", "false"),
            ("sum", "paymentSum"),
            ("count", "yes"),
        ],
    );
    insta::assert_snapshot!(sql, @"SELECT SUM(paymentSum) AS sum_paymentSum, COUNT(*) AS total_count FROM payments");
}

#[test]
fn rest_without_entities_or_aggregates_fails() {
    let plan = rest_plan("payments", &[("entities", "false")]);
    let err = generate_plan_sql(&SqlGenContext::new(), &plan).unwrap_err();
    assert_eq!(
        err.kind,
        QErrorKind::EmptySelection {
            table: "payments".into()
        }
    );
    assert_eq!(err.class(), ErrorClass::Validation);
}

// ============================================================================
// Name checks
// ============================================================================

#[test]
fn unknown_column_is_rejected_when_table_declares_columns() {
    let schema = make_test_schema();
    let plan = rest_plan("payments", &[("attributes", "id,nickname")]);
    let ctx = SqlGenContext::for_entity(&schema, "payments");

    let err = generate_plan_sql(&ctx, &plan).unwrap_err();
    assert_eq!(
        err.kind,
        QErrorKind::ColumnNotFound {
            table: "payments".into(),
            column: "nickname".into(),
        }
    );
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn unknown_filter_column_is_rejected_too() {
    let schema = make_test_schema();
    let plan = rest_plan("payments", &[("nickname", "bob")]);
    let ctx = SqlGenContext::for_entity(&schema, "payments");
    assert!(matches!(
        generate_plan_sql(&ctx, &plan).unwrap_err().kind,
        QErrorKind::ColumnNotFound { .. }
    ));
}

#[test]
fn tables_without_columns_accept_any_field() {
    let schema = make_test_schema();
    let plan = rest_plan("audit_log", &[("attributes", "whatever"), ("actor", "me")]);
    let ctx = SqlGenContext::for_entity(&schema, "audit_log");
    let sql = generate_plan_sql(&ctx, &plan).unwrap().sql;
    insta::assert_snapshot!(sql, @"SELECT whatever FROM audit_log WHERE actor = 'me'");
}

#[test]
fn unsafe_field_names_are_rejected() {
    let plan = rest_plan("payments", &[("id;DROP TABLE payments", "1")]);
    let err = generate_plan_sql(&SqlGenContext::new(), &plan).unwrap_err();
    assert_eq!(
        err.kind,
        QErrorKind::InvalidIdentifier {
            name: "id;DROP TABLE payments".into()
        }
    );
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn unsafe_sort_fields_are_rejected() {
    let plan = rest_plan("payments", &[("sorting", "id desc")]);
    let err = generate_plan_sql(&SqlGenContext::new(), &plan).unwrap_err();
    assert!(matches!(err.kind, QErrorKind::InvalidIdentifier { .. }));
}

#[test]
fn hand_built_plans_are_checked_before_rendering() {
    use quarry_query_schema::{
        EntityRef, FilterCriterion, QueryOperator, QueryValue, RestQueryModel,
    };

    let mut plan = QueryPlan::for_model(
        EntityRef::new("payments").unwrap(),
        &RestQueryModel::default(),
    );
    plan.filters.push(FilterCriterion {
        field: "paymentSum".into(),
        operator: QueryOperator::Between,
        values: vec![QueryValue::from("10")],
        ignore_case: false,
    });
    let err = generate_plan_sql(&SqlGenContext::new(), &plan).unwrap_err();
    assert!(
        matches!(
            err.kind,
            QErrorKind::InvalidFilterArgCount {
                expected: 2,
                actual: 1,
                ..
            }
        ),
        "{:?}",
        err.kind
    );
    assert_eq!(err.class(), ErrorClass::Validation);
}
