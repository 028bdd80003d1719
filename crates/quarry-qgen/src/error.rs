//! Query errors.

use quarry_query_schema::Span;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Source text an error can point into.
pub struct QSource {
    /// The original source code (for rendering diagnostics)
    pub source: String,

    /// Name shown in diagnostics, e.g. `<query>`
    pub name: String,
}

impl QSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            source: source.into(),
            name: name.into(),
        })
    }
}

/// Error while parsing, planning or generating a query.
///
/// Errors raised while reading declarative text carry the source and span,
/// and display as an annotated report. Everything else displays as a single
/// line.
#[derive(Clone)]
pub struct QError {
    /// Source, when the failing input was text
    pub source: Option<Arc<QSource>>,

    /// Location in the source
    pub span: Option<Span>,

    /// Error classification and details
    pub kind: QErrorKind,
}

/// Broad category of a [`QErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The DSL text is malformed.
    Syntax,
    /// The DSL text is well-formed but means something unsupported.
    Semantic,
    /// A query model does not fit the schema or the canonical model.
    Validation,
    /// A component was handed an input or model kind it does not handle.
    UnsupportedInput,
}

/// Error classification for query processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QErrorKind {
    // Syntax
    /// A character that starts no token.
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char },

    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A number token that is not a valid decimal.
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    /// The parser wanted one token and got another.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    // Semantic
    /// A query argument outside the closed set.
    #[error("unsupported argument: {name}")]
    UnsupportedArgument { name: String },

    /// An operator key that is not recognized.
    #[error("unsupported operator '{operator}' on {field}")]
    UnsupportedOperator { field: String, operator: String },

    /// A value of the wrong type for its position.
    #[error("{field} must be {expected}, found {found}")]
    WrongShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A required key is absent.
    #[error("{field} is required")]
    MissingField { field: String },

    /// A sort direction other than ASC or DESC.
    #[error("{field} must be ASC or DESC, found '{value}'")]
    InvalidDirection { field: String, value: String },

    /// A number that is not a non-negative 32-bit integer.
    #[error("{field} must be a non-negative integer, found {value}")]
    InvalidInteger { field: String, value: String },

    // Validation
    /// A table referenced in the query does not exist in the schema.
    #[error("unknown entity '{table}'")]
    TableNotFound { table: String },

    /// An entity name that is empty or whitespace.
    #[error("entity name must not be blank")]
    BlankEntity,

    /// A column referenced in the query does not exist in the table.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// A filter value that cannot become a scalar.
    #[error("unsupported value type {found} for filter on '{field}'")]
    UnsupportedValueType { field: String, found: &'static str },

    /// Invalid filter arguments (wrong count)
    #[error("invalid arguments for filter '{filter}': expected {expected} arguments, got {actual}")]
    InvalidFilterArgCount {
        filter: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid filter argument type
    #[error("invalid argument for filter '{filter}': {reason}")]
    InvalidFilterArgType { filter: String, reason: String },

    /// A name that cannot be written into SQL unquoted.
    #[error("'{name}' is not a valid SQL identifier")]
    InvalidIdentifier { name: String },

    /// Row projection was turned off and nothing else was requested.
    #[error("nothing to select from '{table}': entities are disabled and no aggregates were requested")]
    EmptySelection { table: String },

    // Unsupported input
    /// A component was handed a kind of input it does not handle.
    #[error("{component} does not support {input} input")]
    UnsupportedInput { component: String, input: String },
}

impl QErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            QErrorKind::UnexpectedChar { .. }
            | QErrorKind::UnterminatedString
            | QErrorKind::InvalidNumber { .. }
            | QErrorKind::UnexpectedToken { .. } => ErrorClass::Syntax,
            QErrorKind::UnsupportedArgument { .. }
            | QErrorKind::UnsupportedOperator { .. }
            | QErrorKind::WrongShape { .. }
            | QErrorKind::MissingField { .. }
            | QErrorKind::InvalidDirection { .. }
            | QErrorKind::InvalidInteger { .. } => ErrorClass::Semantic,
            QErrorKind::TableNotFound { .. }
            | QErrorKind::BlankEntity
            | QErrorKind::ColumnNotFound { .. }
            | QErrorKind::UnsupportedValueType { .. }
            | QErrorKind::InvalidFilterArgCount { .. }
            | QErrorKind::InvalidFilterArgType { .. }
            | QErrorKind::InvalidIdentifier { .. }
            | QErrorKind::EmptySelection { .. } => ErrorClass::Validation,
            QErrorKind::UnsupportedInput { .. } => ErrorClass::UnsupportedInput,
        }
    }
}

impl QError {
    pub fn new(kind: QErrorKind) -> Self {
        Self {
            source: None,
            span: None,
            kind,
        }
    }

    pub fn spanned(kind: QErrorKind, span: Span) -> Self {
        Self {
            source: None,
            span: Some(span),
            kind,
        }
    }

    /// Attach source text, unless some is attached already.
    pub fn with_source(mut self, source: &Arc<QSource>) -> Self {
        if self.source.is_none() {
            self.source = Some(source.clone());
        }
        self
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl From<QErrorKind> for QError {
    fn from(kind: QErrorKind) -> Self {
        QError::new(kind)
    }
}

impl fmt::Debug for QError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for QError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

        let (Some(source), Some(span)) = (&self.source, self.span) else {
            return write!(f, "{}", self.kind);
        };

        let message = self.kind.to_string();
        let start = span.offset.min(source.source.len());
        let end = span.end().min(source.source.len()).max(start);

        let mut output = Vec::new();

        let report = Report::build(ReportKind::Error, (&source.name, start..end))
            .with_message(&message)
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_label(Label::new((&source.name, start..end)).with_message(&message))
            .finish();

        report
            .write((&source.name, Source::from(&source.source)), &mut output)
            .ok();

        write!(f, "{}", String::from_utf8_lossy(&output))
    }
}

impl std::error::Error for QError {}
