//! Query results and mapping them into Rust types.

use indexmap::IndexMap;
use quarry_qgen::TOTAL_COUNT;

mod row;
pub use row::{FromRow, FromValue, Row, RowError};

mod value;
pub use value::Value;

/// What an executor returns for one statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Entity rows, in result order.
    pub rows: Vec<Row>,
    /// Aggregate results by alias, e.g. `sum_rate` or `total_count`.
    pub aggregates: IndexMap<String, Value>,
}

impl QueryResult {
    pub fn aggregate(&self, alias: &str) -> Option<&Value> {
        self.aggregates.get(alias)
    }

    /// The `COUNT(*)` result, when the query asked for one.
    pub fn total_count(&self) -> Option<i64> {
        self.aggregate(TOTAL_COUNT).and_then(Value::as_i64)
    }
}

/// Maps result rows into entities.
pub struct ResultMapper;

impl ResultMapper {
    /// Map every row of `result` into a `T`, stopping at the first failure.
    pub fn map<T: FromRow>(result: &QueryResult) -> Result<Vec<T>, RowError> {
        result.rows.iter().map(T::from_row).collect()
    }

    /// Map only the first row.
    pub fn first<T: FromRow>(result: &QueryResult) -> Result<Option<T>, RowError> {
        result.rows.first().map(T::from_row).transpose()
    }
}
