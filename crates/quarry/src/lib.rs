//! Turn REST parameters and a declarative query DSL into validated,
//! SQL-ready query plans.
//!
//! Two input styles are accepted:
//!
//! - flat REST parameters such as `?status=PAID&paymentSum=>=100&sorting=-id`,
//!   with the entity supplied by the caller
//! - a GraphQL-flavored DSL that names its own entity:
//!
//! ```text
//! query {
//!   payments(where: { status: { eq: PAID } }, pagination: { page: 1, pageSize: 20 }) {
//!     id
//!     paymentSum
//!   }
//! }
//! ```
//!
//! Both normalize to one [`QueryPlan`], which renders as a single line of SQL
//! or runs through a caller-supplied [`QueryExecutor`].
//!
//! ```
//! use quarry::{QueryInput, QueryPipeline, Registry};
//! use quarry::schema::{Column, FieldType, Schema, Table};
//!
//! let schema = Schema::new().with_table(
//!     Table::new("payments")
//!         .with_column(Column::new("id", FieldType::BigInt))
//!         .with_column(Column::new("status", FieldType::Text)),
//! );
//! let registry = Registry::with_defaults();
//! let pipeline = QueryPipeline::new(&registry, &schema);
//!
//! let input = QueryInput::rest("payments", [("status", Some("PAID")), ("sorting", Some("-id"))]);
//! let statement = pipeline.compile(&input).unwrap();
//! assert_eq!(
//!     statement.sql,
//!     "SELECT * FROM payments WHERE status = 'PAID' ORDER BY id DESC"
//! );
//! ```
//!
//! # Logging
//!
//! Every stage emits `tracing` spans and events at `debug` and `trace`. No
//! subscriber is installed.

mod error;
mod execute;
mod pipeline;
pub mod query;
mod registry;
mod traced;

pub use error::{Error, ExecutorError};
pub use execute::{QueryExecutor, Statement};
pub use pipeline::QueryPipeline;
pub use query::QueryResult;
pub use registry::{
    AnsiSqlGenerator, DeclarativeInputParser, InputKind, QueryInput, QueryInputParser, Registry,
    RestInputParser, SqlGenerator,
};
pub use traced::TracedExecutor;

// Re-export the query model and errors
pub use quarry_qgen::{
    ErrorClass, GeneratedSelect, QError, QErrorKind, QueryModel, QueryPlan, SqlGenContext,
};

/// Schema lookup contract and the in-memory catalog.
pub mod schema {
    pub use quarry_db_schema::*;
}

/// Loading the catalog from `.config/quarry.styx`.
pub mod config {
    pub use quarry_config::*;
}

/// Lower-level access to parsers, the planner and SQL generation.
pub mod qgen {
    pub use quarry_qgen::*;
}

/// Load `.config/quarry.styx` from the current directory upwards and build
/// its catalog.
pub fn load_schema() -> Result<schema::Schema, Error> {
    let (config, path) = quarry_config::load()?;
    let schema = quarry_config::build_schema(&config)?;
    tracing::debug!(path = %path.display(), tables = schema.tables.len(), "loaded schema");
    Ok(schema)
}
