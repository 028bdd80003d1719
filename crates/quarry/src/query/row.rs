//! Rows and mapping them into Rust types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::Value;

/// A row of data as field name → value pairs, in result column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First field called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Read `name` as a `T`.
    pub fn try_get<T: FromValue>(&self, name: &str) -> Result<T, RowError> {
        let value = self.get(name).ok_or_else(|| RowError::MissingColumn {
            column: name.to_string(),
        })?;
        T::from_value(value).ok_or_else(|| RowError::TypeMismatch {
            column: name.to_string(),
            expected: T::EXPECTED,
            actual: value.kind(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Error while reading a row into a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("column '{column}' is missing from the row")]
    MissingColumn { column: String },

    #[error("column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Conversion from a single [`Value`].
pub trait FromValue: Sized {
    /// What the conversion accepts, for error messages.
    const EXPECTED: &'static str;

    /// `None` if `value` has the wrong type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_decimal()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            v => T::from_value(v).map(Some),
        }
    }
}

/// A Rust type built from one result row.
///
/// ```
/// use quarry::query::{FromRow, Row, RowError};
///
/// struct Payment {
///     id: i64,
///     status: String,
/// }
///
/// impl FromRow for Payment {
///     fn from_row(row: &Row) -> Result<Self, RowError> {
///         Ok(Self {
///             id: row.try_get("id")?,
///             status: row.try_get("status")?,
///         })
///     }
/// }
///
/// let row = Row::new().with("id", 7i64).with("status", "PAID");
/// let payment = Payment::from_row(&row).unwrap();
/// assert_eq!(payment.id, 7);
/// assert_eq!(payment.status, "PAID");
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, RowError>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(row.clone())
    }
}
