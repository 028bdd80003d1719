use quarry_config::ConfigError;
use quarry_qgen::{ErrorClass, QError};
use thiserror::Error;

use crate::query::RowError;

/// Failure reported by a [`QueryExecutor`](crate::QueryExecutor).
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Query(#[from] QError),

    #[error("query on '{entity}' failed: {source}")]
    Execution {
        entity: String,
        #[source]
        source: ExecutorError,
    },

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("row mapping failed: {0}")]
    Row(#[from] RowError),
}

impl Error {
    /// Class of the underlying query error, if this is one.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Error::Query(e) => Some(e.class()),
            _ => None,
        }
    }
}
