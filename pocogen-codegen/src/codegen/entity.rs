//! Entity model: a table together with the identifiers derived for it

use pocogen::{IdentifierScope, NamingPolicy};
use tracing::warn;

use super::type_renderer::{RenderedType, TypeRenderer};
use crate::error::Result;
use crate::schema::{Column, Table};

/// A column as it appears on the generated class
#[derive(Debug, Clone)]
pub struct Property<'t> {
    pub column: &'t Column,
    pub name: String,
    pub ty: RenderedType,
}

impl Property<'_> {
    /// Name of the Dapper parameter bound to this property (no `@` escape)
    pub fn parameter_name(&self) -> &str {
        self.name.trim_start_matches('@')
    }

    /// Whether the property name differs from the column name beyond casing
    pub fn is_renamed(&self) -> bool {
        self.name.to_lowercase() != self.column.column_name.to_lowercase()
    }
}

/// One generated class
#[derive(Debug, Clone)]
pub struct Entity<'t> {
    pub table: &'t Table,
    pub class_name: String,
    /// Properties in column ordinal order
    pub properties: Vec<Property<'t>>,
}

impl<'t> Entity<'t> {
    /// Derive property names for every supported column of `table`.
    ///
    /// Names are assigned in ordinal order inside a scope owned by the class,
    /// so the earlier of two colliding columns keeps the bare name.
    pub fn build(
        table: &'t Table,
        class_name: String,
        policy: &NamingPolicy,
        renderer: &dyn TypeRenderer,
    ) -> Result<Self> {
        let mut scope = IdentifierScope::new(class_name.clone());
        let mut properties = Vec::with_capacity(table.columns.len());

        for column in table.columns_by_ordinal() {
            if !renderer.supports(column) {
                warn!(
                    "Skipping {}.{}: unsupported type {}",
                    table.table_name, column.column_name, column.sql_data_type
                );
                continue;
            }
            let name = scope.identifier(&column.column_name, policy)?;
            properties.push(Property {
                column,
                name,
                ty: renderer.render(column),
            });
        }

        Ok(Self {
            table,
            class_name,
            properties,
        })
    }

    /// Members in declaration order: key columns by ordinal, then the rest
    /// alphabetically
    pub fn members(&self) -> Vec<&Property<'t>> {
        let mut members = self.primary_key();
        members.extend(self.sorted(|p| !p.column.is_primary_key_member));
        members
    }

    /// Key properties in ordinal order
    pub fn primary_key(&self) -> Vec<&Property<'t>> {
        self.properties
            .iter()
            .filter(|p| p.column.is_primary_key_member)
            .collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.properties.iter().any(|p| p.column.is_primary_key_member)
    }

    /// Properties written by INSERT/UPDATE, alphabetically
    pub fn writable(&self) -> Vec<&Property<'t>> {
        self.sorted(|p| !p.column.is_generated())
    }

    /// Properties compared by Equals/GetHashCode, alphabetically
    pub fn compared(&self) -> Vec<&Property<'t>> {
        self.sorted(|p| !p.column.is_identity)
    }

    /// The identity column, if it is the table's only key column
    pub fn identity_key(&self) -> Option<&Property<'t>> {
        match self.primary_key().as_slice() {
            [only] if only.column.is_identity => Some(*only),
            _ => None,
        }
    }

    fn sorted(&self, keep: impl Fn(&Property<'t>) -> bool) -> Vec<&Property<'t>> {
        let mut selected: Vec<&Property<'t>> =
            self.properties.iter().filter(|p| keep(*p)).collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected
    }
}
