//! SQL expressions.

use rust_decimal::Decimal;

use crate::ColumnName;

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference
    Column(ColumnName),
    /// A string literal
    String(String),
    /// A decimal literal, written in plain notation
    Number(Decimal),
    /// A boolean literal
    Bool(bool),
    /// Binary operation (e.g., a = b, a AND b)
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `expr BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    /// Function call
    FnCall { name: String, args: Vec<Expr> },
    /// COUNT(*)
    CountAll,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    And,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Like => "LIKE",
            BinOp::And => "AND",
        }
    }
}

// Convenience constructors
impl Expr {
    pub fn column(name: ColumnName) -> Self {
        Expr::Column(name)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::String(s.into())
    }

    pub fn number(n: Decimal) -> Self {
        Expr::Number(n)
    }

    pub fn bool(b: bool) -> Self {
        Expr::Bool(b)
    }

    /// Create a function call expression: `name(args...)`
    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::FnCall {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Wrap in `LOWER(...)`
    pub fn lower(self) -> Self {
        Expr::call("LOWER", [self])
    }

    /// Create a binary expression: self <op> other
    pub fn binop(self, op: BinOp, other: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(self),
            op,
            right: Box::new(other),
        }
    }

    /// Create an AND expression: self AND other
    pub fn and(self, other: Expr) -> Self {
        self.binop(BinOp::And, other)
    }

    /// Create a BETWEEN expression: self BETWEEN low AND high
    pub fn between(self, low: Expr, high: Expr) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
        }
    }

    /// Fold expressions with AND, left to right. `None` when empty.
    pub fn and_all(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::and)
    }
}
