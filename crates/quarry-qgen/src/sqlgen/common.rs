//! Expression helpers shared by statement generators.

use quarry_query_schema::{FilterCriterion, QueryOperator, QueryValue};
use quarry_sql::{BinOp, Expr, is_plain_ident};

use crate::filter_spec::spec_for;
use crate::{QError, QErrorKind};

/// Reject names that cannot be written into SQL unquoted.
pub fn checked_ident(name: &str) -> Result<&str, QError> {
    if is_plain_ident(name) {
        Ok(name)
    } else {
        Err(QError::new(QErrorKind::InvalidIdentifier {
            name: name.to_string(),
        }))
    }
}

/// A column reference to `name`.
pub fn column_expr(name: &str) -> Result<Expr, QError> {
    Ok(Expr::column(checked_ident(name)?.into()))
}

/// Inline literal for a plan value.
pub fn value_expr(value: &QueryValue) -> Expr {
    match value {
        QueryValue::String(s) => Expr::string(s.as_str()),
        QueryValue::Number(n) => Expr::number(*n),
        QueryValue::Boolean(b) => Expr::bool(*b),
    }
}

fn binop(operator: QueryOperator) -> Option<BinOp> {
    match operator {
        QueryOperator::Eq => Some(BinOp::Eq),
        QueryOperator::Neq => Some(BinOp::Ne),
        QueryOperator::Gt => Some(BinOp::Gt),
        QueryOperator::Gte => Some(BinOp::Ge),
        QueryOperator::Lt => Some(BinOp::Lt),
        QueryOperator::Lte => Some(BinOp::Le),
        QueryOperator::Like => Some(BinOp::Like),
        QueryOperator::Between => None,
    }
}

/// Build the condition for one criterion.
///
/// With `ignore_case`, the column and every operand are wrapped in `LOWER`.
pub fn criterion_expr(criterion: &FilterCriterion) -> Result<Expr, QError> {
    spec_for(criterion.operator).check(&criterion.field, &criterion.values)?;

    let fold = |e: Expr| {
        if criterion.ignore_case { e.lower() } else { e }
    };
    let column = fold(column_expr(&criterion.field)?);
    let mut operands = criterion.values.iter().map(|v| fold(value_expr(v)));

    // arity was checked above, so the operands are there
    let missing = || {
        QError::new(QErrorKind::InvalidFilterArgCount {
            filter: format!("{} on '{}'", criterion.operator, criterion.field),
            expected: spec_for(criterion.operator).args.len(),
            actual: criterion.values.len(),
        })
    };

    match binop(criterion.operator) {
        Some(op) => {
            let right = operands.next().ok_or_else(missing)?;
            Ok(column.binop(op, right))
        }
        None => {
            let low = operands.next().ok_or_else(missing)?;
            let high = operands.next().ok_or_else(missing)?;
            Ok(column.between(low, high))
        }
    }
}
