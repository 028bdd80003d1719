//! Filter operator argument specification.

use quarry_query_schema::{QueryOperator, QueryValue};

use crate::{QError, QErrorKind};

/// What kind of value is valid at an argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// Any scalar: string, number or boolean.
    Scalar,

    /// A string or number used as a LIKE pattern.
    Pattern,
}

impl ArgSpec {
    fn accepts(self, value: &QueryValue) -> bool {
        match self {
            ArgSpec::Scalar => true,
            ArgSpec::Pattern => !matches!(value, QueryValue::Boolean(_)),
        }
    }
}

/// Specification for a filter operator.
pub struct OperatorSpec {
    pub operator: QueryOperator,
    pub args: &'static [ArgSpec],
}

impl OperatorSpec {
    /// Validate `values` against this spec.
    pub fn check(&self, field: &str, values: &[QueryValue]) -> Result<(), QError> {
        if values.len() != self.args.len() {
            return Err(QError::new(QErrorKind::InvalidFilterArgCount {
                filter: format!("{} on '{}'", self.operator, field),
                expected: self.args.len(),
                actual: values.len(),
            }));
        }

        for (i, (value, spec)) in values.iter().zip(self.args).enumerate() {
            if !spec.accepts(value) {
                return Err(QError::new(QErrorKind::InvalidFilterArgType {
                    filter: format!("{} on '{}'", self.operator, field),
                    reason: format!("argument {i} must be a string or number"),
                }));
            }
        }

        Ok(())
    }
}

pub const EQ_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Eq,
    args: &[ArgSpec::Scalar],
};

pub const NEQ_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Neq,
    args: &[ArgSpec::Scalar],
};

pub const GT_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Gt,
    args: &[ArgSpec::Scalar],
};

pub const GTE_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Gte,
    args: &[ArgSpec::Scalar],
};

pub const LT_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Lt,
    args: &[ArgSpec::Scalar],
};

pub const LTE_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Lte,
    args: &[ArgSpec::Scalar],
};

pub const BETWEEN_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Between,
    args: &[ArgSpec::Scalar, ArgSpec::Scalar],
};

pub const LIKE_SPEC: OperatorSpec = OperatorSpec {
    operator: QueryOperator::Like,
    args: &[ArgSpec::Pattern],
};

/// Look up the spec for an operator.
pub fn spec_for(operator: QueryOperator) -> &'static OperatorSpec {
    match operator {
        QueryOperator::Eq => &EQ_SPEC,
        QueryOperator::Neq => &NEQ_SPEC,
        QueryOperator::Gt => &GT_SPEC,
        QueryOperator::Gte => &GTE_SPEC,
        QueryOperator::Lt => &LT_SPEC,
        QueryOperator::Lte => &LTE_SPEC,
        QueryOperator::Between => &BETWEEN_SPEC,
        QueryOperator::Like => &LIKE_SPEC,
    }
}
