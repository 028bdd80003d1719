use super::*;
use crate::fixtures::PAYMENTS_QUERY;
use crate::{ErrorClass, QErrorKind};
use facet_testhelpers::test;
use quarry_query_schema::{
    GraphOperator, GraphValue, QueryOperator, RestFilterCriterion, SortDirection,
};
use rust_decimal::Decimal;

fn tokens(source: &str) -> Vec<TokenKind> {
    let mut tokenizer = Tokenizer::new(source);
    let mut kinds = Vec::new();
    loop {
        let token = tokenizer.next_token().unwrap();
        let done = token.kind == TokenKind::Eof;
        kinds.push(token.kind);
        if done {
            return kinds;
        }
    }
}

fn dsl_error(source: &str) -> crate::QError {
    parse_graph_query(source).unwrap_err()
}

// ============================================================================
// Tokenizer
// ============================================================================

#[test]
fn tokenizes_punctuation_and_words() {
    assert_eq!(
        tokens("{ a(b: [1, \"x\"]) }"),
        [
            TokenKind::LBrace,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::LBracket,
            TokenKind::Number(Decimal::ONE),
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::RBracket,
            TokenKind::RParen,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn eof_repeats_forever() {
    let mut tokenizer = Tokenizer::new("  ");
    for _ in 0..3 {
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.text, "");
    }
}

#[test]
fn backslash_escapes_next_char() {
    let mut tokenizer = Tokenizer::new(r#""a\"b\\c\n""#);
    let token = tokenizer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::String);
    assert_eq!(token.text, r#"a"b\cn"#);
}

#[test]
fn identifiers_allow_underscore_and_digits() {
    let mut tokenizer = Tokenizer::new("_user_2 x");
    let token = tokenizer.next_token().unwrap();
    assert_eq!(token.text, "_user_2");
    assert_eq!(token.span.offset, 0);
    assert_eq!(token.span.len, 7);
}

#[test]
fn negative_and_fractional_numbers() {
    let mut tokenizer = Tokenizer::new("-12.50 7");
    let token = tokenizer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Number(Decimal::new(-1250, 2)));
    assert_eq!(token.text, "-12.50");
}

#[test]
fn unterminated_string_is_syntax_error() {
    for source in [r#""abc"#, r#""abc\"#] {
        let err = Tokenizer::new(source).next_token().unwrap_err();
        assert_eq!(err.kind, QErrorKind::UnterminatedString);
        assert_eq!(err.class(), ErrorClass::Syntax);
    }
}

#[test]
fn invalid_number_is_syntax_error() {
    for source in ["-", "1.2.3"] {
        let err = Tokenizer::new(source).next_token().unwrap_err();
        assert!(
            matches!(err.kind, QErrorKind::InvalidNumber { .. }),
            "{source}: {:?}",
            err.kind
        );
    }
}

#[test]
fn numbers_that_would_round_are_rejected() {
    for source in [
        "0.12345678901234567890123456789012",
        "1.0000000000000000000000000000001",
        "123456789012345678901234567890",
    ] {
        let err = Tokenizer::new(source).next_token().unwrap_err();
        assert_eq!(
            err.kind,
            QErrorKind::InvalidNumber {
                text: source.to_string()
            }
        );
        assert_eq!(err.class(), ErrorClass::Syntax);
    }
}

#[test]
fn unknown_character_is_syntax_error() {
    let err = Tokenizer::new("  @").next_token().unwrap_err();
    assert_eq!(err.kind, QErrorKind::UnexpectedChar { ch: '@' });
    assert_eq!(err.span.unwrap().offset, 2);
}

// ============================================================================
// DSL parser
// ============================================================================

#[test]
fn parses_payments_query() {
    let model = parse_graph_query(PAYMENTS_QUERY).unwrap();

    assert_eq!(model.resource.as_str(), "payments");
    assert_eq!(
        model.selections,
        ["currencyCode", "paymentSum", "rate", "status"]
    );
    assert_eq!(model.aggregations.sum, ["paymentSum", "rate"]);
    assert!(model.distinct);
    assert!(model.count);

    let pagination = model.pagination.unwrap();
    assert_eq!(pagination.page, Some(1));
    assert_eq!(pagination.page_size, Some(50));

    assert_eq!(model.order_by.len(), 2);
    assert_eq!(model.order_by[0].field, "conclusionDate");
    assert_eq!(model.order_by[0].direction, SortDirection::Desc);
    assert_eq!(model.order_by[1].field, "id");
    assert_eq!(model.order_by[1].direction, SortDirection::Asc);

    assert_eq!(model.filters.len(), 5);
    let fields: Vec<&str> = model.filters.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(
        fields,
        ["userId", "userEmail", "paymentSum", "userName", "authorEmail"]
    );
    let ignore_case = &model.filters[4];
    assert_eq!(ignore_case.operator, GraphOperator::EqIgnoreCase);
    assert_eq!(
        ignore_case.value.value,
        GraphValue::String("ignoreCaseEmail@email.com".into())
    );
}

#[test]
fn query_keyword_is_optional() {
    let model = parse_graph_query("{ payments { id } }").unwrap();
    assert_eq!(model.resource.as_str(), "payments");
    assert_eq!(model.selections, ["id"]);
    assert!(model.pagination.is_none());
    assert!(model.filters.is_empty());
}

#[test]
fn query_keyword_is_case_sensitive() {
    let err = dsl_error("Query { payments { id } }");
    assert_eq!(err.class(), ErrorClass::Syntax);
    assert!(matches!(err.kind, QErrorKind::UnexpectedToken { .. }));
}

#[test]
fn commas_are_optional() {
    let with = parse_graph_query("{ t(sum: [a, b], count: true) { x, y } }").unwrap();
    let without = parse_graph_query("{ t(sum: [a b] count: true) { x y } }").unwrap();
    assert_eq!(with, without);
}

#[test]
fn booleans_are_case_insensitive() {
    let model = parse_graph_query("{ t(distinct: TRUE, count: False) { x } }").unwrap();
    assert!(model.distinct);
    assert!(!model.count);
}

#[test]
fn extra_aggregates_are_accepted() {
    let model = parse_graph_query("{ t(avg: [a], min: [\"b\"], max: [c]) { x } }").unwrap();
    assert_eq!(model.aggregations.avg, ["a"]);
    assert_eq!(model.aggregations.min, ["b"]);
    assert_eq!(model.aggregations.max, ["c"]);
}

#[test]
fn repeated_argument_keeps_last_value() {
    let model = parse_graph_query("{ t(count: true, count: false) { x } }").unwrap();
    assert!(!model.count);
}

#[test]
fn trailing_input_is_rejected() {
    let err = dsl_error("{ t { x } } }");
    assert_eq!(
        err.kind,
        QErrorKind::UnexpectedToken {
            expected: "end of input".into(),
            found: "'}'".into(),
        }
    );
}

#[test]
fn unsupported_argument() {
    let err = dsl_error("{ t(limit: 5) { x } }");
    assert_eq!(
        err.kind,
        QErrorKind::UnsupportedArgument {
            name: "limit".into()
        }
    );
    assert_eq!(err.class(), ErrorClass::Semantic);
}

#[test]
fn argument_names_are_case_sensitive() {
    let err = dsl_error("{ t(Count: true) { x } }");
    assert!(matches!(err.kind, QErrorKind::UnsupportedArgument { .. }));
}

#[test]
fn distinct_must_be_boolean() {
    let err = dsl_error("{ t(distinct: \"yes\") { x } }");
    assert_eq!(err.kind.to_string(), "distinct must be a boolean, found string");
}

#[test]
fn pagination_must_be_object() {
    let err = dsl_error("{ t(pagination: [1]) { x } }");
    assert_eq!(
        err.kind.to_string(),
        "pagination must be an object, found list"
    );
}

#[test]
fn pagination_values_must_be_integers() {
    let err = dsl_error("{ t(pagination: { page: \"1\" }) { x } }");
    assert_eq!(
        err.kind.to_string(),
        "pagination.page must be numeric, found string"
    );

    let err = dsl_error("{ t(pagination: { pageSize: 2.5 }) { x } }");
    assert!(matches!(err.kind, QErrorKind::InvalidInteger { .. }));
    assert_eq!(err.class(), ErrorClass::Semantic);

    let err = dsl_error("{ t(pagination: { page: -1 }) { x } }");
    assert!(matches!(err.kind, QErrorKind::InvalidInteger { .. }));
}

#[test]
fn order_by_field_is_required() {
    let err = dsl_error("{ t(orderBy: [{ direction: DESC }]) { x } }");
    assert_eq!(err.kind.to_string(), "orderBy.field is required");
}

#[test]
fn order_by_direction_defaults_and_normalizes() {
    let model = parse_graph_query("{ t(orderBy: [{ field: a }, { field: b, direction: desc }]) { x } }")
        .unwrap();
    assert_eq!(model.order_by[0].direction, SortDirection::Asc);
    assert_eq!(model.order_by[1].direction, SortDirection::Desc);

    let err = dsl_error("{ t(orderBy: [{ field: a, direction: UP }]) { x } }");
    assert!(matches!(err.kind, QErrorKind::InvalidDirection { .. }));
}

#[test]
fn where_field_must_be_object() {
    let err = dsl_error("{ t(where: { userId: 5 }) { x } }");
    assert_eq!(
        err.kind.to_string(),
        "where.userId must be an object, found number"
    );
}

#[test]
fn unknown_operator_is_rejected() {
    let err = dsl_error("{ t(where: { userId: { in: [1] } }) { x } }");
    assert_eq!(
        err.kind,
        QErrorKind::UnsupportedOperator {
            field: "where.userId".into(),
            operator: "in".into(),
        }
    );
}

#[test]
fn operator_keys_are_case_insensitive() {
    let model = parse_graph_query("{ t(where: { a: { GTE: 1 }, b: { EqIgnoreCase: \"x\" } }) { x } }")
        .unwrap();
    assert_eq!(model.filters[0].operator, GraphOperator::Gte);
    assert_eq!(model.filters[1].operator, GraphOperator::EqIgnoreCase);
}

#[test]
fn errors_render_with_source() {
    let err = dsl_error("{ t(limit: 5) { x } }");
    let span = err.span.unwrap();
    assert_eq!(span.offset, 4);
    assert_eq!(span.len, 5);

    let rendered = err.to_string();
    assert!(rendered.contains(QUERY_SOURCE_NAME), "{rendered}");
    assert!(rendered.contains("unsupported argument: limit"), "{rendered}");
}

// ============================================================================
// REST parameters
// ============================================================================

#[test]
fn rest_reserved_keys() {
    let model = parse_rest_params([
        ("page", Some("2")),
        ("pageSize", Some("25")),
        ("count", Some("yes")),
        ("distinct", Some("1")),
        ("entities", Some("false")),
        ("attributes", Some("id, name,,status ")),
        ("sum", Some("amount")),
        ("avg", Some("rate")),
        ("sorting", Some("-createdAt,id")),
    ]);

    assert_eq!(model.page, Some(2));
    assert_eq!(model.page_size, Some(25));
    assert!(model.count);
    assert!(model.distinct);
    assert!(!model.entities);
    assert_eq!(model.attributes, ["id", "name", "status"]);
    assert_eq!(model.aggregations.sum, ["amount"]);
    assert_eq!(model.aggregations.avg, ["rate"]);
    assert_eq!(model.sorting, ["-createdAt", "id"]);
    assert!(model.filters.is_empty());
}

#[test]
fn rest_lists_sorting_and_one_filter() {
    let model = parse_rest_params([
        ("attributes", Some("id, name , ,email")),
        ("sum", Some("total, amount")),
        ("sorting", Some("name,-createdAt")),
        ("status", Some("active")),
    ]);

    assert_eq!(model.attributes, ["id", "name", "email"]);
    assert_eq!(model.aggregations.sum, ["total", "amount"]);
    assert_eq!(model.sorting, ["name", "-createdAt"]);
    assert_eq!(
        model.filters,
        [RestFilterCriterion {
            field: "status".to_string(),
            operator: QueryOperator::Eq,
            values: vec!["active".to_string()],
            ignore_case: false,
        }]
    );
}

#[test]
fn rest_defaults() {
    let model = parse_rest_params(Vec::<(String, Option<String>)>::new());
    assert_eq!(model.page, None);
    assert_eq!(model.page_size, None);
    assert!(!model.count);
    assert!(!model.distinct);
    assert!(model.entities);
    assert!(model.attributes.is_empty());
}

#[test]
fn rest_page_size_prefers_camel_case() {
    let model = parse_rest_params([("page_size", Some("10")), ("pageSize", Some("20"))]);
    assert_eq!(model.page_size, Some(20));

    let model = parse_rest_params([("page_size", Some("10"))]);
    assert_eq!(model.page_size, Some(10));

    // a present but unparsable pageSize still wins
    let model = parse_rest_params([("pageSize", Some("lots")), ("page_size", Some("10"))]);
    assert_eq!(model.page_size, None);
}

#[test]
fn rest_integers() {
    assert_eq!(parse_integer(Some(" 7 ")), Some(7));
    assert_eq!(parse_integer(Some("")), None);
    assert_eq!(parse_integer(Some("   ")), None);
    assert_eq!(parse_integer(Some("abc")), None);
    assert_eq!(parse_integer(Some("1.5")), None);
    assert_eq!(parse_integer(Some("-3")), None);
    assert_eq!(parse_integer(None), None);
}

#[test]
fn rest_booleans() {
    assert!(parse_boolean(Some("TRUE"), false));
    assert!(parse_boolean(Some("Yes"), false));
    assert!(parse_boolean(Some("1"), false));
    assert!(!parse_boolean(Some("on"), true));
    assert!(!parse_boolean(Some(""), true));
    assert!(parse_boolean(None, true));
    assert!(!parse_boolean(None, false));
}

#[test]
fn rest_filter_operators() {
    let cases = [
        ("10..20", QueryOperator::Between, vec!["10", "20"]),
        ("10..", QueryOperator::Between, vec!["10", ""]),
        ("1..2..3", QueryOperator::Between, vec!["1", "2..3"]),
        (">=100", QueryOperator::Gte, vec!["100"]),
        ("<=100", QueryOperator::Lte, vec!["100"]),
        ("!=PAID", QueryOperator::Neq, vec!["PAID"]),
        (">5", QueryOperator::Gt, vec!["5"]),
        ("<5", QueryOperator::Lt, vec!["5"]),
        ("=a%b", QueryOperator::Eq, vec!["a%b"]),
        ("Jo%", QueryOperator::Like, vec!["Jo%"]),
        ("J_n", QueryOperator::Like, vec!["J_n"]),
        ("plain", QueryOperator::Eq, vec!["plain"]),
        ("", QueryOperator::Eq, vec![""]),
    ];
    for (raw, operator, values) in cases {
        let filter = parse_filter("f", raw);
        assert_eq!(filter.operator, operator, "{raw}");
        assert_eq!(filter.values, values, "{raw}");
        assert!(!filter.ignore_case, "{raw}");
    }
}

#[test]
fn rest_ignore_case_prefix() {
    let filter = parse_filter("email", "^John@Example.com");
    assert!(filter.ignore_case);
    assert_eq!(filter.operator, QueryOperator::Eq);
    assert_eq!(filter.values, ["John@Example.com"]);

    let filter = parse_filter("name", "^a..b");
    assert!(filter.ignore_case);
    assert_eq!(filter.operator, QueryOperator::Between);

    // only one caret is stripped
    let filter = parse_filter("name", "^^x");
    assert_eq!(filter.values, ["^x"]);
}

#[test]
fn rest_filters_follow_input_order_and_skip_absent() {
    let model = parse_rest_params([
        ("status", Some("PAID")),
        ("page", Some("1")),
        ("missing", None),
        ("amount", Some(">=10")),
    ]);
    let fields: Vec<&str> = model.filters.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["status", "amount"]);
}

#[test]
fn rest_reserved_keys_never_filter() {
    let params: Vec<(&str, Option<&str>)> =
        RESERVED_KEYS.iter().map(|k| (*k, Some("x%"))).collect();
    let model = parse_rest_params(params);
    assert!(model.filters.is_empty());
}

mod props {
    use super::super::*;
    use proptest::prelude::*;
    use quarry_query_schema::QueryOperator;

    proptest! {
        #[test]
        fn between_always_has_two_values(low in "[a-z0-9]{0,8}", high in "[a-z0-9.]{0,8}") {
            let filter = parse_filter("f", &format!("{low}..{high}"));
            prop_assert_eq!(filter.operator, QueryOperator::Between);
            prop_assert_eq!(filter.values.len(), 2);
            prop_assert_eq!(&filter.values[0], &low);
        }

        #[test]
        fn every_filter_has_values(raw in "\\PC{0,16}") {
            let filter = parse_filter("f", &raw);
            let expected = if filter.operator == QueryOperator::Between { 2 } else { 1 };
            prop_assert_eq!(filter.values.len(), expected);
        }

        #[test]
        fn list_items_are_trimmed_and_non_empty(raw in "[a-z ,]{0,24}") {
            for item in parse_list(Some(&raw)) {
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item.trim(), item.as_str());
                prop_assert!(!item.contains(','));
            }
        }

        #[test]
        fn integers_round_trip(n in any::<u32>()) {
            prop_assert_eq!(parse_integer(Some(&format!(" {n} "))), Some(n));
        }

        #[test]
        fn tokenizer_never_panics(source in "\\PC{0,32}") {
            let mut tokenizer = Tokenizer::new(&source);
            for _ in 0..40 {
                match tokenizer.next_token() {
                    Ok(token) if token.kind == TokenKind::Eof => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
    }
}
