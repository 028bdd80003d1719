//! Configuration file handling for quarry.
//!
//! Looks for `.config/quarry.styx` in the current directory or any parent
//! directory. The file declares the tables queries may read from:
//!
//! ```styx
//! tables {
//!     payments {
//!         doc "Settled and pending payments"
//!         columns {id bigint, paymentSum numeric, status text}
//!     }
//!     audit_log {}
//! }
//! ```
//!
//! A table without `columns` accepts any field name.

use facet::Facet;
use indexmap::IndexMap;
use quarry_db_schema::{Column, FieldType, Schema, Table};
use std::path::{Path, PathBuf};

/// Location of the config file, relative to a project directory.
pub const CONFIG_PATH: &str = ".config/quarry.styx";

/// The quarry configuration file.
#[derive(Debug, Default, Facet)]
pub struct Config {
    /// Tables, by entity name.
    #[facet(default)]
    pub tables: IndexMap<String, TableConfig>,
}

/// One table declaration.
#[derive(Debug, Default, Facet)]
pub struct TableConfig {
    /// Column name -> SQL type name (`bigint`, `text`, `numeric`, ...).
    #[facet(default)]
    pub columns: IndexMap<String, String>,

    /// Doc comment for the table.
    #[facet(default)]
    pub doc: Option<String>,
}

/// Load configuration from `.config/quarry.styx`, searching up the directory tree.
pub fn load() -> Result<(Config, PathBuf), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Path) -> Result<(Config, PathBuf), ConfigError> {
    let config_path = find_config_file(start)?;
    let content =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(e.to_string()))?;
    let config = parse(&content)?;
    tracing::debug!(
        path = %config_path.display(),
        tables = config.tables.len(),
        "loaded config"
    );
    Ok((config, config_path))
}

/// Parse configuration text.
pub fn parse(content: &str) -> Result<Config, ConfigError> {
    facet_styx::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Find `.config/quarry.styx` by searching up the directory tree.
pub fn find_config_file(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_PATH);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}

/// Build the in-memory catalog the config declares.
///
/// Column types are matched case-insensitively; an unknown type name is an
/// error rather than being skipped.
pub fn build_schema(config: &Config) -> Result<Schema, ConfigError> {
    let mut schema = Schema::new();
    for (name, table_config) in &config.tables {
        let mut table = Table::new(name.as_str());
        if let Some(doc) = &table_config.doc {
            table = table.doc(doc.as_str());
        }
        for (column, type_name) in &table_config.columns {
            let field_type: FieldType = type_name.parse().map_err(|e| {
                ConfigError::Invalid(format!("{name}.{column}: {e}"))
            })?;
            table = table.with_column(Column::new(column.as_str(), field_type));
        }
        tracing::trace!(table = name.as_str(), columns = table.columns.len(), "table");
        schema.add_table(table);
    }
    Ok(schema)
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No `.config/quarry.styx` found in any parent directory
    NotFound,
    /// I/O error reading the file
    Io(String),
    /// Parse error in the Styx file
    Parse(String),
    /// The file parsed but declares something unusable
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound => {
                write!(
                    f,
                    "No .config/quarry.styx found in current directory or any parent"
                )
            }
            ConfigError::Io(e) => write!(f, "Failed to read .config/quarry.styx: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse .config/quarry.styx: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid .config/quarry.styx: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
