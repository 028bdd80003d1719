//! parse → normalize → generate, and optionally execute.

use quarry_db_schema::SchemaLookup;
use quarry_qgen::{
    GeneratedSelect, QError, QErrorKind, QSource, QUERY_SOURCE_NAME, QueryModel, QueryPlan,
    QueryPlanner, SqlGenContext,
};

use crate::Error;
use crate::execute::{QueryExecutor, Statement};
use crate::query::QueryResult;
use crate::registry::{QueryInput, Registry};

/// Runs one input through a registry against a schema.
///
/// Stateless: one pipeline can serve any number of inputs, from any thread.
#[derive(Clone, Copy)]
pub struct QueryPipeline<'a> {
    registry: &'a Registry,
    schema: &'a dyn SchemaLookup,
}

impl<'a> QueryPipeline<'a> {
    pub fn new(registry: &'a Registry, schema: &'a dyn SchemaLookup) -> Self {
        Self { registry, schema }
    }

    /// Parse `input` into its model.
    pub fn parse(&self, input: &QueryInput) -> Result<QueryModel, Error> {
        Ok(self.registry.parse(input)?)
    }

    /// Normalize a parsed model. REST models take their entity from `input`.
    pub fn normalize(&self, input: &QueryInput, model: &QueryModel) -> Result<QueryPlan, Error> {
        let planner = QueryPlanner::new(self.schema);
        let plan = match (model, input) {
            (QueryModel::Graph(m), _) => planner.plan_graph(m),
            (QueryModel::Rest(m), QueryInput::Rest { entity, .. }) => planner.plan_rest(m, entity),
            (QueryModel::Rest(_), QueryInput::Declarative { .. }) => {
                Err(QError::new(QErrorKind::UnsupportedInput {
                    component: "query planner".to_string(),
                    input: "rest model without an entity".to_string(),
                }))
            }
        };
        Ok(plan.map_err(|e| with_input_source(e, input))?)
    }

    /// Render a model directly with the registry's generator.
    pub fn generate(&self, model: &QueryModel) -> Result<GeneratedSelect, Error> {
        Ok(self.registry.generator().generate_model(model)?)
    }

    /// Parse, normalize and render `input`.
    pub fn compile(&self, input: &QueryInput) -> Result<Statement, Error> {
        let _span = tracing::debug_span!("compile", kind = %input.kind()).entered();

        let model = self.parse(input)?;
        let plan = self.normalize(input, &model)?;
        let ctx = SqlGenContext::for_entity(self.schema, plan.entity.as_str());
        let select = self
            .registry
            .generator()
            .generate_plan(&ctx, &plan)
            .map_err(|e| with_input_source(e, input))?;

        tracing::debug!(entity = plan.entity.as_str(), sql = select.sql.as_str(), "compiled");
        Ok(Statement {
            plan,
            sql: select.sql,
            columns: select
                .columns
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
        })
    }

    /// Compile `input` and run it with `executor`.
    pub fn execute(
        &self,
        input: &QueryInput,
        executor: &dyn QueryExecutor,
    ) -> Result<QueryResult, Error> {
        let statement = self.compile(input)?;
        let entity = statement.entity();
        let table = self.schema.table(entity).ok_or_else(|| {
            QError::new(QErrorKind::TableNotFound {
                table: entity.to_string(),
            })
        })?;

        let _span = tracing::debug_span!("execute", entity).entered();
        let result = executor
            .execute(&statement, table)
            .map_err(|source| Error::Execution {
                entity: entity.to_string(),
                source,
            })?;
        tracing::debug!(rows = result.rows.len(), "executed");
        Ok(result)
    }
}

/// Declarative errors that point into the text get the text attached.
fn with_input_source(error: QError, input: &QueryInput) -> QError {
    match input {
        QueryInput::Declarative { source } if error.span.is_some() => {
            error.with_source(&QSource::new(QUERY_SOURCE_NAME, source.as_str()))
        }
        _ => error,
    }
}
