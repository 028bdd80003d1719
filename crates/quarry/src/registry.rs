//! Component registry: which parser handles which input, and which generator
//! renders SQL.
//!
//! There is no global discovery. A [`Registry`] is built explicitly, usually
//! with [`Registry::with_defaults`], and handed to a
//! [`QueryPipeline`](crate::QueryPipeline).

use indexmap::IndexMap;
use quarry_qgen::{
    GeneratedSelect, QError, QErrorKind, QueryModel, QueryPlan, SqlGenContext,
    generate_graph_sql, generate_plan_sql, parse_graph_query, parse_rest_params,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The styles of input quarry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Flat key/value parameters, with the entity supplied alongside.
    Rest,
    /// Declarative DSL text naming its own entity.
    Declarative,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Rest => "rest",
            InputKind::Declarative => "declarative",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw query, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Rest {
        entity: String,
        /// Parameters in request order. A key without a value maps to `None`.
        params: IndexMap<String, Option<String>>,
    },
    Declarative {
        source: String,
    },
}

impl QueryInput {
    /// REST input for `entity`. A repeated key keeps its first position and
    /// its last value.
    pub fn rest<I, K, V>(entity: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryInput::Rest {
            entity: entity.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    pub fn declarative(source: impl Into<String>) -> Self {
        QueryInput::Declarative {
            source: source.into(),
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            QueryInput::Rest { .. } => InputKind::Rest,
            QueryInput::Declarative { .. } => InputKind::Declarative,
        }
    }
}

fn unsupported(component: &str, input: impl fmt::Display) -> QError {
    QError::new(QErrorKind::UnsupportedInput {
        component: component.to_string(),
        input: input.to_string(),
    })
}

// ============================================================================
// Parsers
// ============================================================================

/// Turns one kind of raw input into a query model.
pub trait QueryInputParser: Send + Sync {
    /// The input kind this parser handles.
    fn kind(&self) -> InputKind;

    /// Parse `input`. Inputs of another kind are an unsupported-input error.
    fn parse(&self, input: &QueryInput) -> Result<QueryModel, QError>;
}

/// Parses flat REST parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestInputParser;

impl QueryInputParser for RestInputParser {
    fn kind(&self) -> InputKind {
        InputKind::Rest
    }

    fn parse(&self, input: &QueryInput) -> Result<QueryModel, QError> {
        match input {
            QueryInput::Rest { params, .. } => {
                let pairs = params.iter().map(|(k, v)| (k.as_str(), v.as_deref()));
                Ok(QueryModel::Rest(parse_rest_params(pairs)))
            }
            other => Err(unsupported("rest parser", other.kind())),
        }
    }
}

/// Parses declarative DSL text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeInputParser;

impl QueryInputParser for DeclarativeInputParser {
    fn kind(&self) -> InputKind {
        InputKind::Declarative
    }

    fn parse(&self, input: &QueryInput) -> Result<QueryModel, QError> {
        match input {
            QueryInput::Declarative { source } => Ok(QueryModel::Graph(parse_graph_query(source)?)),
            other => Err(unsupported("declarative parser", other.kind())),
        }
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Renders SQL from models and plans.
pub trait SqlGenerator: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Render a model directly, without a schema.
    fn generate_model(&self, model: &QueryModel) -> Result<GeneratedSelect, QError>;

    /// Render a normalized plan.
    fn generate_plan(
        &self,
        ctx: &SqlGenContext,
        plan: &QueryPlan,
    ) -> Result<GeneratedSelect, QError>;
}

/// Single-line SQL with inlined literals.
///
/// Models are rendered for the declarative style only: a REST model carries
/// no entity, so it has to be planned first.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiSqlGenerator;

impl SqlGenerator for AnsiSqlGenerator {
    fn name(&self) -> &str {
        "ansi sql generator"
    }

    fn generate_model(&self, model: &QueryModel) -> Result<GeneratedSelect, QError> {
        match model {
            QueryModel::Graph(m) => generate_graph_sql(m),
            QueryModel::Rest(_) => Err(unsupported(self.name(), InputKind::Rest)),
        }
    }

    fn generate_plan(
        &self,
        ctx: &SqlGenContext,
        plan: &QueryPlan,
    ) -> Result<GeneratedSelect, QError> {
        generate_plan_sql(ctx, plan)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Parsers by input kind, plus the SQL generator.
#[derive(Clone)]
pub struct Registry {
    parsers: HashMap<InputKind, Arc<dyn QueryInputParser>>,
    generator: Arc<dyn SqlGenerator>,
}

impl Registry {
    /// A registry with no parsers.
    pub fn new(generator: Arc<dyn SqlGenerator>) -> Self {
        Self {
            parsers: HashMap::new(),
            generator,
        }
    }

    /// Both built-in parsers and [`AnsiSqlGenerator`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(Arc::new(AnsiSqlGenerator));
        registry.register_parser(Arc::new(RestInputParser));
        registry.register_parser(Arc::new(DeclarativeInputParser));
        registry
    }

    /// Register `parser` for its kind, returning the parser it replaces.
    pub fn register_parser(
        &mut self,
        parser: Arc<dyn QueryInputParser>,
    ) -> Option<Arc<dyn QueryInputParser>> {
        let kind = parser.kind();
        tracing::debug!(%kind, "registering parser");
        self.parsers.insert(kind, parser)
    }

    pub fn set_generator(&mut self, generator: Arc<dyn SqlGenerator>) {
        tracing::debug!(generator = generator.name(), "setting generator");
        self.generator = generator;
    }

    pub fn parser(&self, kind: InputKind) -> Option<&dyn QueryInputParser> {
        self.parsers.get(&kind).map(|p| p.as_ref())
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    /// Parse `input` with the parser registered for its kind.
    pub fn parse(&self, input: &QueryInput) -> Result<QueryModel, QError> {
        let kind = input.kind();
        let parser = self
            .parser(kind)
            .ok_or_else(|| unsupported("registry", kind))?;
        parser.parse(input)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.parsers.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("Registry")
            .field("parsers", &kinds)
            .field("generator", &self.generator.name())
            .finish()
    }
}
