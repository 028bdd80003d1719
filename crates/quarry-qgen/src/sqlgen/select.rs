//! SQL generation for SELECT statements.

use quarry_query_schema::{EntityRef, GraphQueryModel, QueryPlan, SortDirection};
use quarry_sql::{ColumnName, Expr, FromClause, OrderBy, SelectColumn, SelectStmt, render};
use rust_decimal::Decimal;

use super::SqlGenContext;
use super::common::{checked_ident, column_expr, criterion_expr};
use crate::planner::build_graph_plan;
use crate::{QError, QErrorKind};

/// Alias of the `COUNT(*)` column.
pub const TOTAL_COUNT: &str = "total_count";

/// A rendered SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSelect {
    /// The SQL, on one line, with literals inlined.
    pub sql: String,
    /// Result column names in SELECT order. Empty for `SELECT *`.
    pub columns: Vec<ColumnName>,
}

/// Render a declarative model without consulting a schema.
pub fn generate_graph_sql(model: &GraphQueryModel) -> Result<GeneratedSelect, QError> {
    let entity = EntityRef::new(model.resource.as_str())
        .ok_or_else(|| QError::spanned(QErrorKind::BlankEntity, model.resource.span))?;
    let plan = build_graph_plan(entity, model)?;
    generate_plan_sql(&SqlGenContext::default(), &plan)
}

/// Render a canonical plan.
pub fn generate_plan_sql(
    ctx: &SqlGenContext,
    plan: &QueryPlan,
) -> Result<GeneratedSelect, QError> {
    let _span =
        tracing::debug_span!("generate_plan_sql", entity = plan.entity.as_str()).entered();

    let table = checked_ident(plan.entity.as_str())?;
    if let Some(handle) = ctx.table {
        for field in plan.referenced_fields() {
            if !handle.has_field(field) {
                return Err(QError::new(QErrorKind::ColumnNotFound {
                    table: handle.name().to_string(),
                    column: field.to_string(),
                }));
            }
        }
    }

    let mut stmt = SelectStmt::new().distinct(plan.flags.distinct);
    let mut columns = Vec::new();

    if plan.flags.entities {
        for field in &plan.projection {
            let name: ColumnName = checked_ident(field)?.into();
            columns.push(name.clone());
            stmt = stmt.column(SelectColumn::expr(Expr::column(name)));
        }
    }

    for (kind, field) in plan.aggregations.iter() {
        let alias: ColumnName = kind.alias(field).into();
        let call = Expr::call(kind.function(), [column_expr(field)?]);
        columns.push(alias.clone());
        stmt = stmt.column(SelectColumn::aliased(call, alias));
    }

    if plan.flags.count {
        let alias: ColumnName = TOTAL_COUNT.into();
        columns.push(alias.clone());
        stmt = stmt.column(SelectColumn::aliased(Expr::CountAll, alias));
    }

    if columns.is_empty() && !plan.flags.entities {
        return Err(QError::new(QErrorKind::EmptySelection {
            table: table.to_string(),
        }));
    }

    stmt = stmt.from(FromClause::table(table.into()));

    let conditions = plan
        .filters
        .iter()
        .map(criterion_expr)
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(condition) = Expr::and_all(conditions) {
        stmt = stmt.where_(condition);
    }

    for sort in &plan.sorting {
        let expr = column_expr(&sort.field)?;
        stmt = stmt.order_by(match sort.direction {
            SortDirection::Asc => OrderBy::asc(expr),
            SortDirection::Desc => OrderBy::desc(expr),
        });
    }

    if let Some(limit) = plan.pagination.limit() {
        stmt = stmt.limit(Expr::number(Decimal::from(limit)));
    }
    if let Some(offset) = plan.pagination.offset() {
        stmt = stmt.offset(Expr::number(Decimal::from(offset)));
    }

    let sql = render(&stmt).sql;
    tracing::debug!(sql = sql.as_str(), "generated select");
    Ok(GeneratedSelect { sql, columns })
}
