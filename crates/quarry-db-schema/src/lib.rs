//! Database schema types for quarry.
//!
//! The planner only ever asks two questions of a schema: "does this entity
//! exist?" and "what does this field look like?". [`SchemaLookup`] and
//! [`TableHandle`] are that contract; [`Schema`] is an in-memory
//! implementation built by hand or from configuration.

use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Resolves entity names to table metadata.
///
/// Implementations must be safe to share across threads: one lookup may
/// serve many concurrent pipelines.
pub trait SchemaLookup: Send + Sync {
    /// Look up the table backing `entity`. Matching is exact.
    fn table(&self, entity: &str) -> Option<&dyn TableHandle>;
}

/// Metadata about one table, as seen by the planner and SQL generator.
pub trait TableHandle: Send + Sync {
    /// Table name as it should appear in SQL.
    fn name(&self) -> &str;

    /// Type of `field`, if the table declares it.
    fn field_type(&self, field: &str) -> Option<FieldType>;

    /// Whether the table lists its columns at all.
    ///
    /// Tables that declare nothing accept any field name.
    fn declares_fields(&self) -> bool;

    /// Whether `field` may be referenced in a query against this table.
    fn has_field(&self, field: &str) -> bool {
        !self.declares_fields() || self.field_type(field).is_some()
    }
}

/// Column types known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// SMALLINT (2 bytes)
    SmallInt,
    /// INTEGER (4 bytes)
    Integer,
    /// BIGINT (8 bytes)
    BigInt,
    /// REAL (4 bytes floating point)
    Real,
    /// DOUBLE PRECISION (8 bytes floating point)
    DoublePrecision,
    /// NUMERIC (arbitrary precision)
    Numeric,
    /// BOOLEAN
    Boolean,
    /// TEXT
    Text,
    /// TIMESTAMPTZ
    Timestamptz,
    /// DATE
    Date,
    /// TIME
    Time,
    /// UUID
    Uuid,
    /// JSONB
    Jsonb,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::SmallInt => write!(f, "SMALLINT"),
            FieldType::Integer => write!(f, "INTEGER"),
            FieldType::BigInt => write!(f, "BIGINT"),
            FieldType::Real => write!(f, "REAL"),
            FieldType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            FieldType::Numeric => write!(f, "NUMERIC"),
            FieldType::Boolean => write!(f, "BOOLEAN"),
            FieldType::Text => write!(f, "TEXT"),
            FieldType::Timestamptz => write!(f, "TIMESTAMPTZ"),
            FieldType::Date => write!(f, "DATE"),
            FieldType::Time => write!(f, "TIME"),
            FieldType::Uuid => write!(f, "UUID"),
            FieldType::Jsonb => write!(f, "JSONB"),
        }
    }
}

/// Returned when a type name does not match any [`FieldType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    /// Parses SQL type names and their common aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "smallint" | "int2" => FieldType::SmallInt,
            "integer" | "int" | "int4" => FieldType::Integer,
            "bigint" | "int8" => FieldType::BigInt,
            "real" | "float4" => FieldType::Real,
            "double precision" | "double" | "float8" => FieldType::DoublePrecision,
            "numeric" | "decimal" => FieldType::Numeric,
            "boolean" | "bool" => FieldType::Boolean,
            "text" | "varchar" | "string" => FieldType::Text,
            "timestamptz" | "timestamp" => FieldType::Timestamptz,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "uuid" => FieldType::Uuid,
            "jsonb" | "json" => FieldType::Jsonb,
            _ => return Err(UnknownFieldType(s.to_string())),
        };
        Ok(ty)
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    pub field_type: FieldType,
    /// Whether the column allows NULL
    pub nullable: bool,
    /// Doc comment (if any)
    pub doc: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            doc: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns, indexed by name, in declaration order
    pub columns: IndexMap<String, Column>,
    /// Doc comment (if any)
    pub doc: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a column. A column with the same name is replaced.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }
}

impl TableHandle for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        self.columns.get(field).map(|c| c.field_type)
    }

    fn declares_fields(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// A complete catalog of tables.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tables in the schema, indexed by name
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. A table with the same name is replaced.
    pub fn with_table(mut self, table: Table) -> Self {
        self.add_table(table);
        self
    }

    /// Add a table in place. A table with the same name is replaced.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

impl SchemaLookup for Schema {
    fn table(&self, entity: &str) -> Option<&dyn TableHandle> {
        self.get_table(entity).map(|t| t as &dyn TableHandle)
    }
}
