//! The canonical query plan.
//!
//! Both input styles normalize to a [`QueryPlan`]; everything downstream
//! (SQL generation, execution adapters) only ever sees this shape.

use std::fmt;

use crate::{ModelView, QueryValue};

/// Comparison operators of the canonical model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    Like,
}

impl QueryOperator {
    /// All operators, in declaration order.
    pub const ALL: [QueryOperator; 8] = [
        QueryOperator::Eq,
        QueryOperator::Neq,
        QueryOperator::Gt,
        QueryOperator::Gte,
        QueryOperator::Lt,
        QueryOperator::Lte,
        QueryOperator::Between,
        QueryOperator::Like,
    ];

    /// SQL spelling of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Neq => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Between => "BETWEEN",
            QueryOperator::Like => "LIKE",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QueryOperator::Eq => "EQ",
            QueryOperator::Neq => "NEQ",
            QueryOperator::Gt => "GT",
            QueryOperator::Gte => "GTE",
            QueryOperator::Lt => "LT",
            QueryOperator::Lte => "LTE",
            QueryOperator::Between => "BETWEEN",
            QueryOperator::Like => "LIKE",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Parse `ASC` / `DESC`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// The entity (table) a plan reads from. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef(String);

impl EntityRef {
    /// `None` if `name` is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One predicate on one field.
///
/// `values` holds exactly two entries for `BETWEEN` and exactly one otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriterion {
    pub field: String,
    pub operator: QueryOperator,
    pub values: Vec<QueryValue>,
    pub ignore_case: bool,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Page-based pagination. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Pagination {
    /// Row limit, present iff a page size is.
    pub fn limit(&self) -> Option<u64> {
        self.page_size.map(u64::from)
    }

    /// Row offset, present iff both page and page size are.
    ///
    /// Pages below 1 are treated as page 1.
    pub fn offset(&self) -> Option<u64> {
        let page = self.page?;
        let size = self.page_size?;
        Some(u64::from(page.saturating_sub(1)) * u64::from(size))
    }
}

/// Aggregate functions a plan can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateKind {
    /// SQL function name.
    pub fn function(self) -> &'static str {
        match self {
            AggregateKind::Sum => "SUM",
            AggregateKind::Avg => "AVG",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
        }
    }

    /// Prefix of the result column alias, e.g. `sum` in `sum_rate`.
    pub fn prefix(self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Avg => "avg",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }

    /// Result column alias for `field`.
    pub fn alias(self, field: &str) -> String {
        format!("{}_{}", self.prefix(), field)
    }
}

/// Fields to aggregate, per function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregations {
    pub sum: Vec<String>,
    pub avg: Vec<String>,
    pub min: Vec<String>,
    pub max: Vec<String>,
}

impl Aggregations {
    pub fn is_empty(&self) -> bool {
        self.sum.is_empty() && self.avg.is_empty() && self.min.is_empty() && self.max.is_empty()
    }

    pub fn fields(&self, kind: AggregateKind) -> &[String] {
        match kind {
            AggregateKind::Sum => &self.sum,
            AggregateKind::Avg => &self.avg,
            AggregateKind::Min => &self.min,
            AggregateKind::Max => &self.max,
        }
    }

    /// Every (function, field) pair: all sums, then averages, minimums, maximums.
    pub fn iter(&self) -> impl Iterator<Item = (AggregateKind, &str)> {
        [
            AggregateKind::Sum,
            AggregateKind::Avg,
            AggregateKind::Min,
            AggregateKind::Max,
        ]
        .into_iter()
        .flat_map(move |kind| self.fields(kind).iter().map(move |f| (kind, f.as_str())))
    }
}

/// Query-wide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFlags {
    /// Add `COUNT(*) AS total_count`.
    pub count: bool,
    /// `SELECT DISTINCT`.
    pub distinct: bool,
    /// Whether row fields are projected; `false` keeps only aggregates.
    pub entities: bool,
}

impl Default for QueryFlags {
    fn default() -> Self {
        Self {
            count: false,
            distinct: false,
            entities: true,
        }
    }
}

/// A validated, input-agnostic read query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub entity: EntityRef,
    /// Fields to select; empty selects all.
    pub projection: Vec<String>,
    /// Predicates, joined with AND in order.
    pub filters: Vec<FilterCriterion>,
    pub sorting: Vec<SortField>,
    pub pagination: Pagination,
    pub aggregations: Aggregations,
    pub flags: QueryFlags,
}

impl QueryPlan {
    /// A plan over `entity` taking projection, aggregates, paging and flags
    /// from `model`. Filters and sorting start empty.
    pub fn for_model(entity: EntityRef, model: &impl ModelView) -> Self {
        Self {
            entity,
            projection: model.projection().to_vec(),
            filters: Vec::new(),
            sorting: Vec::new(),
            pagination: model.pagination(),
            aggregations: model.aggregations().clone(),
            flags: QueryFlags {
                count: model.count(),
                distinct: model.distinct(),
                entities: model.entities(),
            },
        }
    }

    /// Every field name the plan references, in first-seen order, without duplicates.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let fields = self
            .projection
            .iter()
            .map(String::as_str)
            .chain(self.aggregations.iter().map(|(_, f)| f))
            .chain(self.filters.iter().map(|c| c.field.as_str()))
            .chain(self.sorting.iter().map(|s| s.field.as_str()));
        for field in fields {
            if !seen.contains(&field) {
                seen.push(field);
            }
        }
        seen
    }
}
