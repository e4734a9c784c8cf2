//! Metadata structures for the logical schema

use serde::{Deserialize, Serialize};

/// A whole database: the input of one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogicalSchema {
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Whether a table is a base table or a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    #[serde(rename = "TABLE", alias = "BASE TABLE")]
    Table,
    #[serde(rename = "VIEW")]
    View,
}

/// Metadata for a database table or view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    /// Table name
    pub table_name: String,

    /// Schema (namespace) the table lives in, e.g. `dbo`
    #[serde(default)]
    pub table_schema: String,

    /// TABLE or VIEW
    pub table_type: TableType,

    /// Columns in the table
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Metadata for a column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Column {
    /// Column name
    pub column_name: String,

    /// 1-based position in the table
    pub ordinal_position: u32,

    /// Whether the column is nullable
    pub is_nullable: bool,

    /// Whether the column is part of the primary key
    pub is_primary_key_member: bool,

    /// Whether the column is an identity (auto-increment) column
    pub is_identity: bool,

    /// Whether the column is computed by the database
    pub is_computed: bool,

    /// Whether the column is the row GUID column
    pub is_row_guid: bool,

    /// SQL Server data type, e.g. `nvarchar`
    pub sql_data_type: String,

    /// CLR type name, e.g. `System.Int32`
    pub clr_type: Option<String>,
}

impl Table {
    pub fn is_view(&self) -> bool {
        self.table_type == TableType::View
    }

    /// Columns in ordinal order
    pub fn columns_by_ordinal(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);
        columns
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Primary key columns in ordinal order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns_by_ordinal()
            .into_iter()
            .filter(|c| c.is_primary_key_member)
            .collect()
    }
}

impl Column {
    /// Whether the database generates this column's value on insert
    pub fn is_generated(&self) -> bool {
        self.is_identity || self.is_row_guid || self.is_computed
    }
}
