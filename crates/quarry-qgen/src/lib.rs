//! Query parsing, planning and SQL generation for quarry.
//!
//! Flat REST parameters and declarative DSL text are parsed into typed
//! models, normalized into a [`QueryPlan`], and rendered as SQL.

// Error types
mod error;
pub use error::{ErrorClass, QError, QErrorKind, QSource};

// Happy types
pub use quarry_query_schema::*;

// Input parsers
mod parse;
pub use parse::*;

// Query planner
mod planner;
pub use planner::{QueryPlanner, coerce_graph_value, coerce_rest_value};

// SQL generation
mod sqlgen;
pub use sqlgen::{
    GeneratedSelect, SqlGenContext, TOTAL_COUNT, generate_graph_sql, generate_plan_sql,
};

// Internal stuff
mod decimal;
mod filter_spec;
pub use filter_spec::{ArgSpec, OperatorSpec, spec_for};

#[cfg(test)]
mod fixtures;
