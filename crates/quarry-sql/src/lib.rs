//! SQL AST and rendering.
//!
//! Build a `SELECT` as a typed AST, then render it to a single line of SQL
//! with literals inlined.

use strid::braid;

mod expr;
pub use expr::*;

mod render;
pub use render::*;

mod stmt;
pub use stmt::*;

/// Result of rendering SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSql {
    /// The SQL text, on a single line.
    pub sql: String,
}

/// The name of a table.
#[braid]
pub struct TableName;

/// The name of a column (or column alias).
#[braid]
pub struct ColumnName;

/// A SQL string literal wrapper.
///
/// Display writes the value quoted with single quotes, doubling any embedded
/// quote.
///
/// # Example
/// ```
/// use quarry_sql::Lit;
/// assert_eq!(format!("{}", Lit("foo")), "'foo'");
/// assert_eq!(format!("{}", Lit("it's")), "'it''s'");
/// ```
pub struct Lit<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Lit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'")?;
        for c in self.0.as_ref().chars() {
            if c == '\'' {
                write!(f, "''")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "'")
    }
}

/// Whether `name` can be rendered as a bare identifier.
///
/// Identifiers are written unquoted, so only `[A-Za-z_][A-Za-z0-9_]*` is
/// accepted. Callers validate names with this before building the AST.
///
/// # Example
/// ```
/// use quarry_sql::is_plain_ident;
/// assert!(is_plain_ident("paymentSum"));
/// assert!(is_plain_ident("_id2"));
/// assert!(!is_plain_ident("2fast"));
/// assert!(!is_plain_ident("name; DROP TABLE x"));
/// assert!(!is_plain_ident(""));
/// ```
pub fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
