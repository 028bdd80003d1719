//! Model of a parsed declarative query.

use crate::{Aggregations, GraphValue, Meta, QueryOperator, SortDirection};

/// Operators recognized as keys inside a `where` field object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    EqIgnoreCase,
}

impl GraphOperator {
    /// Resolve an operator key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        let op = match key.to_ascii_lowercase().as_str() {
            "eq" => GraphOperator::Eq,
            "neq" => GraphOperator::Neq,
            "gt" => GraphOperator::Gt,
            "gte" => GraphOperator::Gte,
            "lt" => GraphOperator::Lt,
            "lte" => GraphOperator::Lte,
            "like" => GraphOperator::Like,
            "eqignorecase" => GraphOperator::EqIgnoreCase,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical operator this maps to. `EqIgnoreCase` becomes `Eq`.
    pub fn canonical(self) -> QueryOperator {
        match self {
            GraphOperator::Eq | GraphOperator::EqIgnoreCase => QueryOperator::Eq,
            GraphOperator::Neq => QueryOperator::Neq,
            GraphOperator::Gt => QueryOperator::Gt,
            GraphOperator::Gte => QueryOperator::Gte,
            GraphOperator::Lt => QueryOperator::Lt,
            GraphOperator::Lte => QueryOperator::Lte,
            GraphOperator::Like => QueryOperator::Like,
        }
    }

    pub fn ignore_case(self) -> bool {
        matches!(self, GraphOperator::EqIgnoreCase)
    }
}

/// `pagination: { page, pageSize }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphPagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One `orderBy` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// One `field: { op: value }` pair from `where`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFilterCriterion {
    pub field: String,
    pub operator: GraphOperator,
    pub value: Meta<GraphValue>,
}

/// A parsed declarative query: one resource, its arguments and selections.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQueryModel {
    pub resource: Meta<String>,
    pub selections: Vec<String>,
    pub pagination: Option<GraphPagination>,
    pub distinct: bool,
    pub count: bool,
    pub aggregations: Aggregations,
    pub order_by: Vec<GraphOrderBy>,
    pub filters: Vec<GraphFilterCriterion>,
}

impl GraphQueryModel {
    /// A model selecting `selections` from `resource`, with no arguments.
    pub fn new(resource: Meta<String>, selections: Vec<String>) -> Self {
        Self {
            resource,
            selections,
            pagination: None,
            distinct: false,
            count: false,
            aggregations: Aggregations::default(),
            order_by: Vec::new(),
            filters: Vec::new(),
        }
    }
}
