//! Model of flat REST query parameters.

use crate::{Aggregations, QueryOperator};

/// A filter derived from one non-reserved parameter.
///
/// Values stay raw strings; numeric coercion happens during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestFilterCriterion {
    pub field: String,
    pub operator: QueryOperator,
    pub values: Vec<String>,
    pub ignore_case: bool,
}

/// Parsed REST parameters. Carries no entity: the caller supplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestQueryModel {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub count: bool,
    pub distinct: bool,
    pub entities: bool,
    pub attributes: Vec<String>,
    pub aggregations: Aggregations,
    /// Raw sort tokens; a leading `-` means descending.
    pub sorting: Vec<String>,
    pub filters: Vec<RestFilterCriterion>,
}

impl Default for RestQueryModel {
    fn default() -> Self {
        Self {
            page: None,
            page_size: None,
            count: false,
            distinct: false,
            entities: true,
            attributes: Vec::new(),
            aggregations: Aggregations::default(),
            sorting: Vec::new(),
            filters: Vec::new(),
        }
    }
}
