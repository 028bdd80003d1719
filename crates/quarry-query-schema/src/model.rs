//! One read contract over both concrete models.

use crate::{Aggregations, GraphQueryModel, Pagination, RestQueryModel};

/// Which input style produced a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Rest,
    Graph,
}

/// A parsed query, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryModel {
    Rest(RestQueryModel),
    Graph(GraphQueryModel),
}

/// The read contract both concrete models share.
///
/// The planner builds every plan through this, so a REST model and a DSL
/// model asking the same thing produce the same plan skeleton.
pub trait ModelView {
    fn kind(&self) -> ModelKind;

    /// Fields to select: REST `attributes`, or DSL selections.
    fn projection(&self) -> &[String];

    fn aggregations(&self) -> &Aggregations;

    fn pagination(&self) -> Pagination;

    fn count(&self) -> bool;

    fn distinct(&self) -> bool;

    /// Whether rows are projected. The DSL always projects its selections.
    fn entities(&self) -> bool;
}

impl ModelView for RestQueryModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Rest
    }

    fn projection(&self) -> &[String] {
        &self.attributes
    }

    fn aggregations(&self) -> &Aggregations {
        &self.aggregations
    }

    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
    }

    fn count(&self) -> bool {
        self.count
    }

    fn distinct(&self) -> bool {
        self.distinct
    }

    fn entities(&self) -> bool {
        self.entities
    }
}

impl ModelView for GraphQueryModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Graph
    }

    fn projection(&self) -> &[String] {
        &self.selections
    }

    fn aggregations(&self) -> &Aggregations {
        &self.aggregations
    }

    fn pagination(&self) -> Pagination {
        self.pagination
            .map(|p| Pagination {
                page: p.page,
                page_size: p.page_size,
            })
            .unwrap_or_default()
    }

    fn count(&self) -> bool {
        self.count
    }

    fn distinct(&self) -> bool {
        self.distinct
    }

    fn entities(&self) -> bool {
        true
    }
}

impl QueryModel {
    fn view(&self) -> &dyn ModelView {
        match self {
            QueryModel::Rest(m) => m,
            QueryModel::Graph(m) => m,
        }
    }
}

impl ModelView for QueryModel {
    fn kind(&self) -> ModelKind {
        self.view().kind()
    }

    fn projection(&self) -> &[String] {
        self.view().projection()
    }

    fn aggregations(&self) -> &Aggregations {
        self.view().aggregations()
    }

    fn pagination(&self) -> Pagination {
        self.view().pagination()
    }

    fn count(&self) -> bool {
        self.view().count()
    }

    fn distinct(&self) -> bool {
        self.view().distinct()
    }

    fn entities(&self) -> bool {
        self.view().entities()
    }
}

impl From<RestQueryModel> for QueryModel {
    fn from(model: RestQueryModel) -> Self {
        QueryModel::Rest(model)
    }
}

impl From<GraphQueryModel> for QueryModel {
    fn from(model: GraphQueryModel) -> Self {
        QueryModel::Graph(model)
    }
}
