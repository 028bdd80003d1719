//! Value trees.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;

use crate::Meta;

/// Fields of a DSL object, in source order. A repeated key keeps its last value.
pub type GraphObject = IndexMap<Meta<String>, Meta<GraphValue>>;

/// A value as written in the declarative DSL.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    /// `"double quoted"`
    String(String),
    /// `12`, `-3.50`
    Number(Decimal),
    /// `true` / `false`, any case
    Boolean(bool),
    /// Any other bare identifier, e.g. `DESC` or a field name
    Enum(String),
    /// `[a, b, c]`
    List(Vec<Meta<GraphValue>>),
    /// `{ key: value }`
    Object(GraphObject),
}

impl GraphValue {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GraphValue::String(_) => "string",
            GraphValue::Number(_) => "number",
            GraphValue::Boolean(_) => "boolean",
            GraphValue::Enum(_) => "identifier",
            GraphValue::List(_) => "list",
            GraphValue::Object(_) => "object",
        }
    }

    /// The text of a string or bare identifier.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GraphValue::String(s) | GraphValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

/// A scalar value in the canonical plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryValue {
    String(String),
    Number(Decimal),
    Boolean(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) => write!(f, "{s}"),
            QueryValue::Number(n) => write!(f, "{n}"),
            QueryValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl From<Decimal> for QueryValue {
    fn from(n: Decimal) -> Self {
        QueryValue::Number(n)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Boolean(b)
    }
}
