//! The assembled object graph: databases own tables, tables own fields.
//!
//! Every value is built once from catalog rows, rendered, and dropped.
//! Child order is the order the catalog queries returned.

use crate::units::{RowCount, SizeMeasure};
use serde::{Deserialize, Serialize};

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name, unique within its table
    pub name: String,
    /// Column comment. Not fetched yet, always `None`
    pub description: Option<String>,
    /// Database-native type name, e.g. `character varying`
    #[serde(rename = "type")]
    pub data_type: String,
    /// Default expression as text
    pub default: Option<String>,
    /// Whether the column accepts NULL
    pub nullable: bool,
}

/// A table with its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Schema name
    pub schema: String,
    /// Table name, unique within its schema
    pub name: String,
    /// Table comment
    pub description: Option<String>,
    /// Storage size excluding indexes
    pub size: SizeMeasure,
    /// Planner estimate; may be stale right after bulk writes
    pub rows: RowCount,
    /// Columns in physical order
    pub fields: Vec<Field>,
}

impl Table {
    /// `schema.name`, the way the table is addressed in SQL.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// A database with its tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name, unique within the server
    pub name: String,
    /// Database comment
    pub description: Option<String>,
    /// Owner role name
    pub owner: String,
    /// Total storage size
    pub size: SizeMeasure,
    /// Tables, empty when hidden or not accessible
    pub tables: Vec<Table>,
}
