//! Query planner: normalizes concrete models into a canonical [`QueryPlan`].
//!
//! This module handles:
//! - entity resolution against the schema
//! - operator canonicalization (`eqIgnoreCase` becomes `EQ` + ignore case)
//! - value coercion (REST strings become numbers where they parse as one)
//! - operator arity checks

mod coerce;

pub use coerce::{coerce_graph_value, coerce_rest_value};

use quarry_db_schema::SchemaLookup;
use quarry_query_schema::{
    EntityRef, FilterCriterion, GraphQueryModel, ModelView, QueryPlan, RestQueryModel,
    SortDirection, SortField, Span,
};

use crate::filter_spec::spec_for;
use crate::{QError, QErrorKind};

/// Planner that validates entities against a schema.
pub struct QueryPlanner<'a> {
    schema: &'a dyn SchemaLookup,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(schema: &'a dyn SchemaLookup) -> Self {
        Self { schema }
    }

    /// Plan a REST query against `entity`.
    pub fn plan_rest(&self, model: &RestQueryModel, entity: &str) -> Result<QueryPlan, QError> {
        let _span = tracing::debug_span!("plan_rest", entity).entered();
        let entity = self.resolve_entity(entity, None)?;

        let mut filters = Vec::with_capacity(model.filters.len());
        for criterion in &model.filters {
            let values = criterion
                .values
                .iter()
                .map(|v| coerce_rest_value(v))
                .collect();
            filters.push(checked(FilterCriterion {
                field: criterion.field.clone(),
                operator: criterion.operator,
                values,
                ignore_case: criterion.ignore_case,
            })?);
        }

        let mut plan = QueryPlan::for_model(entity, model);
        plan.filters = filters;
        plan.sorting = model.sorting.iter().map(|s| rest_sort_field(s)).collect();
        tracing::debug!(kind = ?model.kind(), filters = plan.filters.len(), "planned");
        Ok(plan)
    }

    /// Plan a declarative query. The entity is the model's resource.
    pub fn plan_graph(&self, model: &GraphQueryModel) -> Result<QueryPlan, QError> {
        let _span =
            tracing::debug_span!("plan_graph", entity = model.resource.as_str()).entered();
        let entity = self.resolve_entity(model.resource.as_str(), Some(model.resource.span))?;
        let plan = build_graph_plan(entity, model)?;
        tracing::debug!(kind = ?model.kind(), filters = plan.filters.len(), "planned");
        Ok(plan)
    }

    fn resolve_entity(&self, name: &str, span: Option<Span>) -> Result<EntityRef, QError> {
        let error = |kind| QError {
            source: None,
            span,
            kind,
        };
        let entity = EntityRef::new(name).ok_or_else(|| error(QErrorKind::BlankEntity))?;
        if self.schema.table(entity.as_str()).is_none() {
            return Err(error(QErrorKind::TableNotFound {
                table: name.to_string(),
            }));
        }
        Ok(entity)
    }
}

/// Build the plan for a declarative model once its entity is known.
pub(crate) fn build_graph_plan(
    entity: EntityRef,
    model: &GraphQueryModel,
) -> Result<QueryPlan, QError> {
    let mut filters = Vec::with_capacity(model.filters.len());
    for criterion in &model.filters {
        let value = coerce_graph_value(&criterion.field, &criterion.value)?;
        filters.push(checked(FilterCriterion {
            field: criterion.field.clone(),
            operator: criterion.operator.canonical(),
            values: vec![value],
            ignore_case: criterion.operator.ignore_case(),
        })?);
    }

    let mut plan = QueryPlan::for_model(entity, model);
    plan.filters = filters;
    plan.sorting = model
        .order_by
        .iter()
        .map(|o| SortField::new(o.field.clone(), o.direction))
        .collect();
    Ok(plan)
}

fn checked(criterion: FilterCriterion) -> Result<FilterCriterion, QError> {
    spec_for(criterion.operator).check(&criterion.field, &criterion.values)?;
    Ok(criterion)
}

/// `-field` sorts descending, anything else ascending.
fn rest_sort_field(token: &str) -> SortField {
    match token.strip_prefix('-') {
        Some(field) => SortField::new(field, SortDirection::Desc),
        None => SortField::new(token, SortDirection::Asc),
    }
}
