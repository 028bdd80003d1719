//! Render SQL AST to string.

use std::fmt;

use crate::expr::Expr;
use crate::stmt::*;
use crate::{Lit, RenderedSql};

/// Wrapper for rendering a `Render` type via `Display`.
///
/// Allows using `write!(f, "{}", Fmt(&expr))` in format strings.
pub struct Fmt<'a, T: Render>(pub &'a T);

impl<T: Render> fmt::Display for Fmt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

// ============================================================================
// Render implementations
// ============================================================================

/// Trait for types that can be rendered to SQL.
pub trait Render {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Render for Expr {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(col) => write!(f, "{}", col.as_str()),
            Expr::String(s) => write!(f, "{}", Lit(s)),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Expr::BinOp { left, op, right } => {
                let left = Fmt(left.as_ref());
                let right = Fmt(right.as_ref());
                let op = op.as_str();
                write!(f, "{left} {op} {right}")
            }
            Expr::Between { expr, low, high } => {
                let expr = Fmt(expr.as_ref());
                let low = Fmt(low.as_ref());
                let high = Fmt(high.as_ref());
                write!(f, "{expr} BETWEEN {low} AND {high}")
            }
            Expr::FnCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", Fmt(arg))?;
                }
                write!(f, ")")
            }
            Expr::CountAll => write!(f, "COUNT(*)"),
        }
    }
}

impl Render for SelectStmt {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT")?;

        if self.distinct {
            write!(f, " DISTINCT")?;
        }

        // Columns
        if self.columns.is_empty() {
            write!(f, " *")?;
        } else {
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {}", Fmt(col))?;
            }
        }

        // FROM
        if let Some(from) = &self.from {
            write!(f, " FROM {}", from.table.as_str())?;
        }

        // WHERE
        if let Some(where_) = &self.where_ {
            let where_ = Fmt(where_);
            write!(f, " WHERE {where_}")?;
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                let expr = Fmt(&order.expr);
                let dir = if order.desc { " DESC" } else { " ASC" };
                write!(f, "{expr}{dir}")?;
            }
        }

        // LIMIT
        if let Some(limit) = &self.limit {
            let limit = Fmt(limit);
            write!(f, " LIMIT {limit}")?;
        }

        // OFFSET
        if let Some(offset) = &self.offset {
            let offset = Fmt(offset);
            write!(f, " OFFSET {offset}")?;
        }

        Ok(())
    }
}

impl Render for SelectColumn {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expr = Fmt(&self.expr);
        write!(f, "{expr}")?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias.as_str())?;
        }
        Ok(())
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

/// Render a statement to SQL.
pub fn render(stmt: &impl Render) -> RenderedSql {
    let sql = format!("{}", Fmt(stmt));
    RenderedSql { sql }
}
