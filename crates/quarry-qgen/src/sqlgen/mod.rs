//! SQL generation from query plans.

mod common;
mod select;

pub use select::{GeneratedSelect, TOTAL_COUNT, generate_graph_sql, generate_plan_sql};

use quarry_db_schema::{SchemaLookup, TableHandle};

/// What generation may check names against.
#[derive(Clone, Copy, Default)]
pub struct SqlGenContext<'a> {
    /// Table the plan reads from. Without one, columns are not checked.
    pub table: Option<&'a dyn TableHandle>,
}

impl<'a> SqlGenContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: &'a dyn TableHandle) -> Self {
        Self { table: Some(table) }
    }

    /// Context for `entity`, if the schema knows it.
    pub fn for_entity(schema: &'a dyn SchemaLookup, entity: &str) -> Self {
        Self {
            table: schema.table(entity),
        }
    }
}

#[cfg(test)]
mod tests;
