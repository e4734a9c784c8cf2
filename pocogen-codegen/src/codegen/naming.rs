//! Naming utilities for code generation

use pocogen::{IdentifierScope, NamingPolicy};

use crate::error::Result;
use crate::schema::Table;

/// Derive a unique class name for every table, in input order.
///
/// Class names share one scope owned by the namespace's last segment, so two
/// tables with the same name in different schemas get distinct classes.
pub fn assign_class_names<'t>(
    tables: &[&'t Table],
    namespace: &str,
    policy: &NamingPolicy,
) -> Result<Vec<(String, &'t Table)>> {
    let owner = namespace.rsplit('.').next().unwrap_or(namespace);
    let mut scope = IdentifierScope::new(owner);
    let mut named = Vec::with_capacity(tables.len());
    for table in tables {
        named.push((scope.identifier(&table.table_name, policy)?, *table));
    }
    Ok(named)
}

/// Destination key of a class in multi-file mode
pub fn file_name_for_class(class_name: &str) -> String {
    format!("{}.cs", class_name.trim_start_matches('@'))
}

/// Bracket-quoted SQL Server identifier, safe inside a C# verbatim string
pub fn sql_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]")).replace('"', "\"\"")
}

/// `[schema].[table]`, or just `[table]` in the default schema
pub fn qualified_table_name(table: &Table, default_schema: &str) -> String {
    if is_default_schema(table, default_schema) {
        sql_identifier(&table.table_name)
    } else {
        format!(
            "{}.{}",
            sql_identifier(&table.table_schema),
            sql_identifier(&table.table_name)
        )
    }
}

pub fn is_default_schema(table: &Table, default_schema: &str) -> bool {
    table.table_schema.is_empty() || table.table_schema == default_schema
}

/// Escape text for a regular C# string literal (without the quotes)
pub fn csharp_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text for a C# verbatim string literal (without the quotes)
pub fn csharp_verbatim(text: &str) -> String {
    text.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableType;

    fn table(schema: &str, name: &str) -> Table {
        Table {
            table_name: name.to_string(),
            table_schema: schema.to_string(),
            table_type: TableType::Table,
            columns: vec![],
        }
    }

    #[test]
    fn test_assign_class_names() {
        let tables = [
            table("Person", "Address"),
            table("dbo", "Address"),
            table("dbo", "order details"),
            table("HumanResources", "vEmployee"),
            table("dbo", "Models"),
        ];
        let refs: Vec<&Table> = tables.iter().collect();
        let names: Vec<String> =
            assign_class_names(&refs, "AdventureWorks.Models", &NamingPolicy::default())
                .unwrap()
                .into_iter()
                .map(|(name, _)| name)
                .collect();
        assert_eq!(
            names,
            vec!["Address", "Address1", "OrderDetails", "vEmployee", "Models1"]
        );
    }

    #[test]
    fn test_file_name_for_class() {
        assert_eq!(file_name_for_class("Person"), "Person.cs");
        assert_eq!(file_name_for_class("@Event"), "Event.cs");
    }

    #[test]
    fn test_qualified_table_name() {
        assert_eq!(
            qualified_table_name(&table("dbo", "ErrorLog"), "dbo"),
            "[ErrorLog]"
        );
        assert_eq!(
            qualified_table_name(&table("Person", "Person"), "dbo"),
            "[Person].[Person]"
        );
        assert_eq!(qualified_table_name(&table("", "Odd]Name"), "dbo"), "[Odd]]Name]");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(sql_identifier("say \"hi\""), "[say \"\"hi\"\"]");
        assert_eq!(csharp_string("a\\b \"c\""), "a\\\\b \\\"c\\\"");
        assert_eq!(csharp_verbatim("Data Source=x\\y;\"q\""), "Data Source=x\\y;\"\"q\"\"");
    }
}
