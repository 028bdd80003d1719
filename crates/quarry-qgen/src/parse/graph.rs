//! Parser for the declarative query DSL.
//!
//! ```text
//! document  := ["query"] "{" IDENT ["(" arguments ")"] "{" selection* "}" "}" EOF
//! arguments := (IDENT ":" value [","])*
//! selection := IDENT [","]
//! value     := STRING | NUMBER | IDENT
//!            | "[" (value [","])* "]"
//!            | "{" (IDENT ":" value [","])* "}"
//! ```

use quarry_query_schema::{
    Aggregations, GraphFilterCriterion, GraphObject, GraphOperator, GraphOrderBy,
    GraphPagination, GraphQueryModel, GraphValue, Meta, SortDirection, Span,
};
use rust_decimal::prelude::ToPrimitive;

use super::token::{Token, TokenKind, Tokenizer};
use crate::{QError, QErrorKind, QSource};

/// Name used for DSL text in diagnostics.
pub const QUERY_SOURCE_NAME: &str = "<query>";

/// Parse a declarative query into its typed model.
///
/// Errors carry the source text so they display as annotated reports.
pub fn parse_graph_query(source: &str) -> Result<GraphQueryModel, QError> {
    let _span = tracing::debug_span!("parse_graph_query", len = source.len()).entered();
    let qsource = QSource::new(QUERY_SOURCE_NAME, source);
    let result = GraphParser::new(source).and_then(|mut parser| parser.document());
    match result {
        Ok(model) => {
            tracing::debug!(
                resource = model.resource.as_str(),
                selections = model.selections.len(),
                filters = model.filters.len(),
                "parsed declarative query"
            );
            Ok(model)
        }
        Err(e) => Err(e.with_source(&qsource)),
    }
}

/// Recursive-descent parser with one token of lookahead.
struct GraphParser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token,
}

impl<'a> GraphParser<'a> {
    fn new(source: &'a str) -> Result<Self, QError> {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer.next_token()?;
        Ok(Self { tokenizer, current })
    }

    fn advance(&mut self) -> Result<Token, QError> {
        let next = self.tokenizer.next_token()?;
        let token = std::mem::replace(&mut self.current, next);
        tracing::trace!(kind = %token.kind, text = token.text.as_str(), "token");
        Ok(token)
    }

    fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(&kind)
    }

    fn unexpected(&self, expected: impl Into<String>) -> QError {
        let found = match self.current.kind {
            TokenKind::Ident => format!("identifier '{}'", self.current.text),
            kind => kind.to_string(),
        };
        QError::spanned(
            QErrorKind::UnexpectedToken {
                expected: expected.into(),
                found,
            },
            self.current.span,
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, QError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    fn expect_ident(&mut self) -> Result<Meta<String>, QError> {
        if !self.check(TokenKind::Ident) {
            return Err(self.unexpected("identifier"));
        }
        let token = self.advance()?;
        Ok(Meta::with_span(token.text, token.span))
    }

    fn skip_comma(&mut self) -> Result<(), QError> {
        if self.check(TokenKind::Comma) {
            self.advance()?;
        }
        Ok(())
    }

    fn document(&mut self) -> Result<GraphQueryModel, QError> {
        if self.check(TokenKind::Ident) && self.current.text == "query" {
            self.advance()?;
        }
        self.expect(TokenKind::LBrace)?;
        let resource = self.expect_ident()?;

        let mut arguments = GraphObject::new();
        if self.check(TokenKind::LParen) {
            self.advance()?;
            arguments = self.fields(TokenKind::RParen)?;
            self.expect(TokenKind::RParen)?;
        }

        self.expect(TokenKind::LBrace)?;
        let selections = self.selections()?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Eof)?;

        build_model(resource, selections, arguments)
    }

    /// `IDENT ":" value` pairs up to (not including) `close`.
    fn fields(&mut self, close: TokenKind) -> Result<GraphObject, QError> {
        let mut map = GraphObject::new();
        while !self.check(close) {
            let key = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let value = self.value()?;
            // a repeated key keeps its first position and takes the last value
            map.insert(key, value);
            self.skip_comma()?;
        }
        Ok(map)
    }

    fn selections(&mut self) -> Result<Vec<String>, QError> {
        let mut selections = Vec::new();
        while !self.check(TokenKind::RBrace) {
            selections.push(self.expect_ident()?.value);
            self.skip_comma()?;
        }
        Ok(selections)
    }

    fn value(&mut self) -> Result<Meta<GraphValue>, QError> {
        let start = self.current.span;
        match self.current.kind {
            TokenKind::LBrace => {
                self.advance()?;
                let map = self.fields(TokenKind::RBrace)?;
                let end = self.expect(TokenKind::RBrace)?.span;
                Ok(Meta::with_span(GraphValue::Object(map), start.to(end)))
            }
            TokenKind::LBracket => {
                self.advance()?;
                let mut items = Vec::new();
                while !self.check(TokenKind::RBracket) {
                    items.push(self.value()?);
                    self.skip_comma()?;
                }
                let end = self.expect(TokenKind::RBracket)?.span;
                Ok(Meta::with_span(GraphValue::List(items), start.to(end)))
            }
            TokenKind::String => {
                let token = self.advance()?;
                Ok(Meta::with_span(GraphValue::String(token.text), token.span))
            }
            TokenKind::Number(n) => {
                let token = self.advance()?;
                Ok(Meta::with_span(GraphValue::Number(n), token.span))
            }
            TokenKind::Ident => {
                let token = self.advance()?;
                let value = if token.text.eq_ignore_ascii_case("true") {
                    GraphValue::Boolean(true)
                } else if token.text.eq_ignore_ascii_case("false") {
                    GraphValue::Boolean(false)
                } else {
                    GraphValue::Enum(token.text)
                };
                Ok(Meta::with_span(value, token.span))
            }
            _ => Err(self.unexpected("value")),
        }
    }
}

// ============================================================================
// Model construction
// ============================================================================

fn build_model(
    resource: Meta<String>,
    selections: Vec<String>,
    arguments: GraphObject,
) -> Result<GraphQueryModel, QError> {
    let mut model = GraphQueryModel::new(resource, selections);
    let mut aggregations = Aggregations::default();

    for (name, value) in &arguments {
        match name.as_str() {
            "pagination" => model.pagination = Some(pagination(value)?),
            "distinct" => model.distinct = as_boolean(value, "distinct")?,
            "count" => model.count = as_boolean(value, "count")?,
            "sum" => aggregations.sum = identifier_list(value, "sum")?,
            "avg" => aggregations.avg = identifier_list(value, "avg")?,
            "min" => aggregations.min = identifier_list(value, "min")?,
            "max" => aggregations.max = identifier_list(value, "max")?,
            "orderBy" => model.order_by = order_by(value)?,
            "where" => model.filters = filters(value)?,
            other => {
                return Err(QError::spanned(
                    QErrorKind::UnsupportedArgument {
                        name: other.to_string(),
                    },
                    name.span,
                ));
            }
        }
    }

    model.aggregations = aggregations;
    Ok(model)
}

fn wrong_shape(value: &Meta<GraphValue>, field: &str, expected: &'static str) -> QError {
    QError::spanned(
        QErrorKind::WrongShape {
            field: field.to_string(),
            expected,
            found: value.kind(),
        },
        value.span,
    )
}

fn as_object<'v>(value: &'v Meta<GraphValue>, field: &str) -> Result<&'v GraphObject, QError> {
    match &value.value {
        GraphValue::Object(map) => Ok(map),
        _ => Err(wrong_shape(value, field, "an object")),
    }
}

fn as_list<'v>(
    value: &'v Meta<GraphValue>,
    field: &str,
) -> Result<&'v [Meta<GraphValue>], QError> {
    match &value.value {
        GraphValue::List(items) => Ok(items),
        _ => Err(wrong_shape(value, field, "a list")),
    }
}

fn as_boolean(value: &Meta<GraphValue>, field: &str) -> Result<bool, QError> {
    match value.value {
        GraphValue::Boolean(b) => Ok(b),
        _ => Err(wrong_shape(value, field, "a boolean")),
    }
}

fn as_identifier(value: &Meta<GraphValue>, field: &str) -> Result<String, QError> {
    match value.as_text() {
        Some(text) => Ok(text.to_string()),
        None => Err(wrong_shape(value, field, "an identifier or string")),
    }
}

/// A number that fits `u32` exactly: no fraction, not negative, not too big.
fn as_integer(value: &Meta<GraphValue>, field: &str) -> Result<u32, QError> {
    let GraphValue::Number(n) = value.value else {
        return Err(wrong_shape(value, field, "numeric"));
    };
    if !n.fract().is_zero() {
        return Err(invalid_integer(value.span, field, n));
    }
    n.to_u32()
        .ok_or_else(|| invalid_integer(value.span, field, n))
}

fn invalid_integer(span: Span, field: &str, n: rust_decimal::Decimal) -> QError {
    QError::spanned(
        QErrorKind::InvalidInteger {
            field: field.to_string(),
            value: n.to_string(),
        },
        span,
    )
}

fn pagination(value: &Meta<GraphValue>) -> Result<GraphPagination, QError> {
    let map = as_object(value, "pagination")?;
    let page = map
        .get("page")
        .map(|v| as_integer(v, "pagination.page"))
        .transpose()?;
    let page_size = map
        .get("pageSize")
        .map(|v| as_integer(v, "pagination.pageSize"))
        .transpose()?;
    Ok(GraphPagination { page, page_size })
}

fn identifier_list(value: &Meta<GraphValue>, field: &str) -> Result<Vec<String>, QError> {
    as_list(value, field)?
        .iter()
        .map(|item| as_identifier(item, field))
        .collect()
}

fn order_by(value: &Meta<GraphValue>) -> Result<Vec<GraphOrderBy>, QError> {
    let mut results = Vec::new();
    for item in as_list(value, "orderBy")? {
        let map = as_object(item, "orderBy")?;
        let field = match map.get("field") {
            Some(v) => as_identifier(v, "orderBy.field")?,
            None => {
                return Err(QError::spanned(
                    QErrorKind::MissingField {
                        field: "orderBy.field".to_string(),
                    },
                    item.span,
                ));
            }
        };
        let direction = match map.get("direction") {
            Some(v) => {
                let raw = as_identifier(v, "orderBy.direction")?;
                SortDirection::parse(&raw).ok_or_else(|| {
                    QError::spanned(
                        QErrorKind::InvalidDirection {
                            field: "orderBy.direction".to_string(),
                            value: raw,
                        },
                        v.span,
                    )
                })?
            }
            None => SortDirection::Asc,
        };
        results.push(GraphOrderBy { field, direction });
    }
    Ok(results)
}

fn filters(value: &Meta<GraphValue>) -> Result<Vec<GraphFilterCriterion>, QError> {
    let mut results = Vec::new();
    for (field, operators) in as_object(value, "where")? {
        let context = format!("where.{}", field.as_str());
        for (key, operand) in as_object(operators, &context)? {
            let operator = GraphOperator::from_key(key.as_str()).ok_or_else(|| {
                QError::spanned(
                    QErrorKind::UnsupportedOperator {
                        field: context.clone(),
                        operator: key.as_str().to_string(),
                    },
                    key.span,
                )
            })?;
            results.push(GraphFilterCriterion {
                field: field.as_str().to_string(),
                operator,
                value: operand.clone(),
            });
        }
    }
    Ok(results)
}
