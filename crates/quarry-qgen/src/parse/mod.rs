//! Input parsing: declarative DSL text and flat REST parameters.

mod graph;
pub use graph::{QUERY_SOURCE_NAME, parse_graph_query};

mod rest;
pub use rest::{
    RESERVED_KEYS, parse_boolean, parse_filter, parse_integer, parse_list, parse_rest_params,
};

mod token;
pub use token::{Token, TokenKind, Tokenizer};

#[cfg(test)]
mod tests;
