//! The execution adapter contract.
//!
//! quarry never talks to a data source itself. Callers hand the pipeline a
//! [`QueryExecutor`] that runs a compiled [`Statement`].

use quarry_db_schema::TableHandle;
use quarry_qgen::QueryPlan;

use crate::ExecutorError;
use crate::query::QueryResult;

/// A compiled query: the plan and the SQL rendered from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub plan: QueryPlan,
    /// Single-line SQL with literals inlined.
    pub sql: String,
    /// Result column names in SELECT order. Empty for `SELECT *`.
    pub columns: Vec<String>,
}

impl Statement {
    pub fn entity(&self) -> &str {
        self.plan.entity.as_str()
    }
}

/// Runs statements against a data source.
pub trait QueryExecutor: Send + Sync {
    /// Run `statement` against `table`, the resolved entity.
    fn execute(
        &self,
        statement: &Statement,
        table: &dyn TableHandle,
    ) -> Result<QueryResult, ExecutorError>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn execute(
        &self,
        statement: &Statement,
        table: &dyn TableHandle,
    ) -> Result<QueryResult, ExecutorError> {
        (**self).execute(statement, table)
    }
}
