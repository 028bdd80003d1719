//! Traced executor wrapper.
//!
//! Wraps any [`QueryExecutor`] and logs every statement via tracing.

use quarry_db_schema::TableHandle;

use crate::ExecutorError;
use crate::execute::{QueryExecutor, Statement};
use crate::query::QueryResult;

/// A wrapper around an executor that logs all statements via tracing.
///
/// This is a thin wrapper that delegates to the inner executor but adds a
/// `tracing::debug_span!` around each call, recording the row count.
///
/// # Example
///
/// ```ignore
/// use quarry::TracedExecutor;
///
/// let executor = TracedExecutor::new(my_executor);
/// let result = pipeline.execute(&input, &executor)?;
/// ```
pub struct TracedExecutor<E> {
    inner: E,
}

impl<E: QueryExecutor> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// Get the inner executor.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: QueryExecutor> QueryExecutor for TracedExecutor<E> {
    fn execute(
        &self,
        statement: &Statement,
        table: &dyn TableHandle,
    ) -> Result<QueryResult, ExecutorError> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %statement.sql,
            entity = table.name(),
            rows = tracing::field::Empty,
            aggregates = tracing::field::Empty,
        );
        let _guard = span.enter();
        match self.inner.execute(statement, table) {
            Ok(result) => {
                span.record("rows", result.rows.len());
                span.record("aggregates", result.aggregates.len());
                Ok(result)
            }
            Err(e) => {
                tracing::debug!(error = %e, "query failed");
                Err(e)
            }
        }
    }
}
