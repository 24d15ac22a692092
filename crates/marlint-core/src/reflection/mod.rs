//! Schema reflection: how the analyser learns table shapes.
//!
//! The main implementation reads a versioned JSON snapshot of the
//! schema; [`FixtureReflection`] backs tests and embedders that build
//! schemas in code. A missing table is a semantic finding the analyser
//! reports; every other reflection failure aborts analysis.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::types::DbType;

/// The snapshot format version this build reads.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A column of a reflected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub db_type: DbType,
    pub nullable: bool,
}

/// A reflected table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Finds a column by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Errors surfaced by schema reflection.
#[derive(Debug, thiserror::Error)]
pub enum ReflectionError {
    /// The queried table does not exist in the schema. The analyser
    /// converts this into a diagnostic instead of failing.
    #[error("Table '{0}' doesn't exist")]
    TableNotFound(String),

    /// The snapshot exists but is not in a shape this build reads.
    #[error("Invalid schema snapshot: {0}")]
    InvalidSchema(String),

    /// The snapshot file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Source of table schemas for the analyser.
pub trait DbReflection {
    /// Resolves a table schema by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// [`ReflectionError::TableNotFound`] when the table is absent;
    /// other variants when the schema source itself is broken.
    fn find_table_schema(&self, table: &str) -> Result<Arc<Table>, ReflectionError>;
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    version: u32,
    tables: BTreeMap<String, RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    #[serde(rename = "type")]
    column_type: String,
    nullable: bool,
}

/// Reflection backed by a JSON schema snapshot.
///
/// The snapshot is validated eagerly at construction; per-table
/// [`Table`] values are built lazily and memoized.
#[derive(Debug)]
pub struct SnapshotReflection {
    tables: BTreeMap<String, RawTable>,
    cache: RefCell<HashMap<String, Arc<Table>>>,
}

impl SnapshotReflection {
    /// Loads and validates a snapshot file.
    ///
    /// # Errors
    ///
    /// I/O and JSON errors from reading the file, plus
    /// [`ReflectionError::InvalidSchema`] for version or shape
    /// mismatches.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReflectionError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a snapshot from its JSON text.
    ///
    /// # Errors
    ///
    /// JSON errors and [`ReflectionError::InvalidSchema`] for version
    /// or shape mismatches.
    pub fn from_json(json: &str) -> Result<Self, ReflectionError> {
        let snapshot: RawSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ReflectionError::InvalidSchema(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }

        for (table, raw) in &snapshot.tables {
            let mut seen: Vec<&str> = Vec::with_capacity(raw.columns.len());
            for column in &raw.columns {
                if column.name.is_empty() {
                    return Err(ReflectionError::InvalidSchema(format!(
                        "table '{table}' has a column with an empty name"
                    )));
                }
                if seen
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(&column.name))
                {
                    return Err(ReflectionError::InvalidSchema(format!(
                        "table '{table}' declares column '{}' twice",
                        column.name
                    )));
                }
                seen.push(&column.name);
            }
        }

        Ok(Self {
            tables: snapshot.tables,
            cache: RefCell::new(HashMap::new()),
        })
    }
}

impl DbReflection for SnapshotReflection {
    fn find_table_schema(&self, table: &str) -> Result<Arc<Table>, ReflectionError> {
        let key = table.to_ascii_lowercase();
        if let Some(cached) = self.cache.borrow().get(&key) {
            return Ok(Arc::clone(cached));
        }

        let (name, raw) = self
            .tables
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(table))
            .ok_or_else(|| ReflectionError::TableNotFound(String::from(table)))?;

        debug!(table = name.as_str(), "building table schema from snapshot");
        let built = Arc::new(Table {
            name: name.clone(),
            columns: raw
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    db_type: parse_column_type(&c.column_type),
                    nullable: c.nullable,
                })
                .collect(),
        });
        self.cache.borrow_mut().insert(key, Arc::clone(&built));
        Ok(built)
    }
}

/// Maps a MariaDB column type string like `int(11) unsigned` or
/// `varchar(255)` to the analyser's type algebra.
#[must_use]
pub fn parse_column_type(column_type: &str) -> DbType {
    let lower = column_type.to_ascii_lowercase();
    let base = lower
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or("");

    match base {
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "bit" | "year"
        | "boolean" | "bool" => DbType::Int,
        "float" | "double" | "real" => DbType::Float,
        "decimal" | "numeric" | "dec" | "fixed" => DbType::Decimal,
        "date" | "datetime" | "timestamp" | "time" => DbType::DateTime,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set"
        | "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" | "json" => {
            DbType::Varchar
        }
        _ => DbType::Unknown,
    }
}

/// In-memory reflection for tests and embedders.
#[derive(Debug, Default)]
pub struct FixtureReflection {
    tables: HashMap<String, Arc<Table>>,
}

impl FixtureReflection {
    /// Creates an empty fixture schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table; columns are `(name, type, nullable)` triples.
    #[must_use]
    pub fn with_table(mut self, name: &str, columns: &[(&str, DbType, bool)]) -> Self {
        let table = Table {
            name: String::from(name),
            columns: columns
                .iter()
                .map(|(column, db_type, nullable)| Column {
                    name: String::from(*column),
                    db_type: *db_type,
                    nullable: *nullable,
                })
                .collect(),
        };
        self.tables
            .insert(name.to_ascii_lowercase(), Arc::new(table));
        self
    }
}

impl DbReflection for FixtureReflection {
    fn find_table_schema(&self, table: &str) -> Result<Arc<Table>, ReflectionError> {
        self.tables
            .get(&table.to_ascii_lowercase())
            .map(Arc::clone)
            .ok_or_else(|| ReflectionError::TableNotFound(String::from(table)))
    }
}
