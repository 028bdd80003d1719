//! Typed query models for quarry.
//!
//! - [`GraphValue`] / [`GraphQueryModel`]: what the declarative DSL parses into
//! - [`RestQueryModel`]: what flat REST parameters parse into
//! - [`QueryModel`]: either of the above, behind one read contract
//! - [`QueryPlan`]: the canonical, input-agnostic plan both normalize to

use std::{borrow::Borrow, hash::Hash, ops::Deref};

mod graph;
pub use graph::*;

mod model;
pub use model::*;

mod plan;
pub use plan::*;

mod rest;
pub use rest::*;

mod value;
pub use value::*;

/// A byte range in query source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        Span::new(start, end - start)
    }
}

/// A value with the source span it was parsed from.
///
/// Equality and hashing only look at the value, so `Meta<String>` works as a
/// map key that can be looked up with a plain `&str`.
#[derive(Debug, Clone)]
pub struct Meta<T> {
    /// The wrapped value.
    pub value: T,

    /// The source span (offset and length).
    pub span: Span,
}

impl<T: Hash> Hash for Meta<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: PartialEq> PartialEq for Meta<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Meta<T> {}

impl Borrow<str> for Meta<String> {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl PartialEq<&str> for Meta<String> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl PartialEq<str> for Meta<String> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<T> Meta<T> {
    /// Create a new spanned value with span information.
    pub fn with_span(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

impl Meta<String> {
    /// Get the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> Deref for Meta<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
