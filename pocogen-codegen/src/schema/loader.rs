//! Schema loading and table filtering

use std::collections::HashSet;
use std::path::Path;

use super::metadata::*;
use crate::error::{CodegenError, Result};

/// Read a JSON logical schema from disk
pub fn load_schema(path: &Path) -> Result<LogicalSchema> {
    let content = std::fs::read_to_string(path)?;
    parse_schema(&content).map_err(|source| CodegenError::SchemaError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON logical schema
pub fn parse_schema(json: &str) -> serde_json::Result<LogicalSchema> {
    serde_json::from_str(json)
}

/// Filter tables based on include/exclude patterns
pub fn filter_tables(tables: Vec<Table>, include: &str, exclude: &str) -> Vec<Table> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .into_iter()
        .filter(|t| {
            let name = &t.table_name;
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .collect()
}
