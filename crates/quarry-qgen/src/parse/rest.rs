//! Parser for flat REST query parameters.
//!
//! Reserved keys configure paging, flags, projection, aggregates and sorting.
//! Every other key is a filter on the field of the same name, with the
//! operator encoded in a prefix of the value:
//!
//! | value        | operator  |
//! |--------------|-----------|
//! | `^...`       | (any of the below, case-insensitive) |
//! | `a..b`       | BETWEEN   |
//! | `>=x`, `<=x` | GTE, LTE  |
//! | `!=x`        | NEQ       |
//! | `>x`, `<x`   | GT, LT    |
//! | `=x`         | EQ        |
//! | contains `%` or `_` | LIKE (value kept as is) |
//! | anything else | EQ       |

use quarry_query_schema::{Aggregations, QueryOperator, RestFilterCriterion, RestQueryModel};

/// Keys that never become filters.
pub const RESERVED_KEYS: [&str; 12] = [
    "page",
    "pageSize",
    "page_size",
    "count",
    "distinct",
    "entities",
    "attributes",
    "sum",
    "avg",
    "min",
    "max",
    "sorting",
];

/// Raw values of the reserved keys. Later duplicates overwrite earlier ones.
#[derive(Default)]
struct Reserved {
    page: Option<String>,
    page_size: Option<String>,
    page_size_snake: Option<String>,
    count: Option<String>,
    distinct: Option<String>,
    entities: Option<String>,
    attributes: Option<String>,
    sum: Option<String>,
    avg: Option<String>,
    min: Option<String>,
    max: Option<String>,
    sorting: Option<String>,
}

impl Reserved {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "page" => &mut self.page,
            "pageSize" => &mut self.page_size,
            "page_size" => &mut self.page_size_snake,
            "count" => &mut self.count,
            "distinct" => &mut self.distinct,
            "entities" => &mut self.entities,
            "attributes" => &mut self.attributes,
            "sum" => &mut self.sum,
            "avg" => &mut self.avg,
            "min" => &mut self.min,
            "max" => &mut self.max,
            "sorting" => &mut self.sorting,
            _ => return None,
        };
        Some(slot)
    }
}

/// Parse flat key/value parameters into a [`RestQueryModel`].
///
/// Never fails: malformed values fall back to their defaults. Filters come
/// out in the iteration order of `params`; parameters without a value do not
/// produce filters.
pub fn parse_rest_params<I, K, V>(params: I) -> RestQueryModel
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut reserved = Reserved::default();
    let mut filters = Vec::new();

    for (key, value) in params {
        let key: &str = key.as_ref();
        let value: Option<&str> = value.as_ref().map(|v| v.as_ref());
        if let Some(slot) = reserved.slot(key) {
            *slot = value.map(str::to_string);
            continue;
        }
        if let Some(value) = value {
            let filter = parse_filter(key, value);
            tracing::trace!(field = key, operator = %filter.operator, "rest filter");
            filters.push(filter);
        }
    }

    let model = RestQueryModel {
        page: parse_integer(reserved.page.as_deref()),
        page_size: parse_integer(
            reserved
                .page_size
                .as_deref()
                .or(reserved.page_size_snake.as_deref()),
        ),
        count: parse_boolean(reserved.count.as_deref(), false),
        distinct: parse_boolean(reserved.distinct.as_deref(), false),
        entities: parse_boolean(reserved.entities.as_deref(), true),
        attributes: parse_list(reserved.attributes.as_deref()),
        aggregations: Aggregations {
            sum: parse_list(reserved.sum.as_deref()),
            avg: parse_list(reserved.avg.as_deref()),
            min: parse_list(reserved.min.as_deref()),
            max: parse_list(reserved.max.as_deref()),
        },
        sorting: parse_list(reserved.sorting.as_deref()),
        filters,
    };
    tracing::debug!(
        filters = model.filters.len(),
        page = ?model.page,
        page_size = ?model.page_size,
        "parsed rest parameters"
    );
    model
}

/// Decode one filter value. The first matching rule wins.
pub fn parse_filter(field: &str, raw: &str) -> RestFilterCriterion {
    let (ignore_case, value) = match raw.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let (operator, values) = if let Some((low, high)) = value.split_once("..") {
        (
            QueryOperator::Between,
            vec![low.to_string(), high.to_string()],
        )
    } else if let Some(rest) = value.strip_prefix(">=") {
        (QueryOperator::Gte, vec![rest.to_string()])
    } else if let Some(rest) = value.strip_prefix("<=") {
        (QueryOperator::Lte, vec![rest.to_string()])
    } else if let Some(rest) = value.strip_prefix("!=") {
        (QueryOperator::Neq, vec![rest.to_string()])
    } else if let Some(rest) = value.strip_prefix('>') {
        (QueryOperator::Gt, vec![rest.to_string()])
    } else if let Some(rest) = value.strip_prefix('<') {
        (QueryOperator::Lt, vec![rest.to_string()])
    } else if let Some(rest) = value.strip_prefix('=') {
        (QueryOperator::Eq, vec![rest.to_string()])
    } else if value.contains(['%', '_']) {
        (QueryOperator::Like, vec![value.to_string()])
    } else {
        (QueryOperator::Eq, vec![value.to_string()])
    };

    RestFilterCriterion {
        field: field.to_string(),
        operator,
        values,
        ignore_case,
    }
}

/// `true`, `1` or `yes` (case-insensitive) is true; any other present value is false.
pub fn parse_boolean(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes"),
    }
}

/// Comma-separated list; items are trimmed and empty items dropped.
pub fn parse_list(value: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed non-negative integer; anything else is `None`.
pub fn parse_integer(value: Option<&str>) -> Option<u32> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}
