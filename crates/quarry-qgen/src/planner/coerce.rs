//! Value coercion into canonical scalars.

use quarry_query_schema::{GraphValue, Meta, QueryValue};

use crate::decimal::parse_exact;
use crate::{QError, QErrorKind};

/// A REST value is a number if it is an exact decimal literal, otherwise a
/// string.
///
/// Plain and scientific notation are both accepted; the text is not trimmed.
/// Digit separators such as `1_000` and literals that would need rounding
/// stay strings.
pub fn coerce_rest_value(raw: &str) -> QueryValue {
    match parse_exact(raw) {
        Some(n) if raw.contains(['e', 'E']) => QueryValue::Number(n.normalize()),
        Some(n) => QueryValue::Number(n),
        None => QueryValue::String(raw.to_string()),
    }
}

/// Scalars map one to one; bare identifiers become strings. Lists and
/// objects cannot be compared against a column.
pub fn coerce_graph_value(field: &str, value: &Meta<GraphValue>) -> Result<QueryValue, QError> {
    match &value.value {
        GraphValue::String(s) | GraphValue::Enum(s) => Ok(QueryValue::String(s.clone())),
        GraphValue::Number(n) => Ok(QueryValue::Number(*n)),
        GraphValue::Boolean(b) => Ok(QueryValue::Boolean(*b)),
        other @ (GraphValue::List(_) | GraphValue::Object(_)) => Err(QError::spanned(
            QErrorKind::UnsupportedValueType {
                field: field.to_string(),
                found: other.kind(),
            },
            value.span,
        )),
    }
}
