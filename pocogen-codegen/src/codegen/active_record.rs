//! Dapper-based Save/Insert/Update methods

use pocogen::CodeWriter;

use super::entity::{Entity, Property};
use super::naming::{qualified_table_name, sql_identifier};
use super::section::ClassSection;
use crate::error::Result;
use crate::schema::TableType;

const OPEN_CONNECTION: &str = "using (var conn = IDbConnectionFactory.CreateConnection())";

/// Active-record persistence for tables with a primary key
#[derive(Debug, Clone)]
pub struct ActiveRecord {
    default_schema: String,
}

impl ActiveRecord {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
        }
    }

    fn save(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        let is_new = entity
            .primary_key()
            .iter()
            .map(|p| format!("{} == {}", p.name, p.ty.default_literal()))
            .collect::<Vec<_>>()
            .join(" && ");
        writer.with_block("public void Save()", |w| -> Result<()> {
            w.write_line(format!(
                "
                if ({is_new})
                    Insert();
                else
                    Update();"
            ));
            Ok(())
        })
    }

    fn insert(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        let table = qualified_table_name(entity.table, &self.default_schema);
        let columns = entity.writable();

        writer.with_block("public void Insert()", |w| -> Result<()> {
            w.with_block(OPEN_CONNECTION, |w| -> Result<()> {
                if columns.is_empty() {
                    w.write_line(format!("string cmd = @\"INSERT INTO {table} DEFAULT VALUES\";"));
                } else {
                    w.with_indented_section(
                        format!("string cmd = @\"\nINSERT INTO {table}\n("),
                        ")",
                        |w| -> Result<()> {
                            w.write_line(column_list(&columns, |p| {
                                sql_identifier(&p.column.column_name)
                            }));
                            Ok(())
                        },
                    )?;
                    w.with_indented_section("VALUES\n(", ")\";", |w| -> Result<()> {
                        w.write_line(column_list(&columns, |p| {
                            format!("@{}", p.parameter_name())
                        }));
                        Ok(())
                    })?;
                }

                w.blank_line();
                match entity.identity_key() {
                    Some(key) => w.write_line(format!(
                        "this.{} = conn.Query<{}>(cmd + \"; SELECT CAST(SCOPE_IDENTITY() AS {});\", this).Single();",
                        key.name,
                        key.ty.clr.name(),
                        key.column.sql_data_type
                    )),
                    None => w.write_line("conn.Execute(cmd, this);"),
                };
                Ok(())
            })
        })
    }

    fn update(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        let table = qualified_table_name(entity.table, &self.default_schema);
        let columns = entity.writable();
        let key = entity.primary_key();

        writer.with_block("public void Update()", |w| -> Result<()> {
            if columns.is_empty() {
                w.write_line("// all columns are generated by the database");
                return Ok(());
            }
            w.with_block(OPEN_CONNECTION, |w| -> Result<()> {
                w.with_indented_section(
                    format!("string cmd = @\"\nUPDATE {table} SET"),
                    "",
                    |w| -> Result<()> {
                        w.write_line(column_list(&columns, |p| {
                            format!(
                                "{} = @{}",
                                sql_identifier(&p.column.column_name),
                                p.parameter_name()
                            )
                        }));
                        Ok(())
                    },
                )?;

                let conditions = key
                    .iter()
                    .map(|p| {
                        format!(
                            "{} = @{}",
                            sql_identifier(&p.column.column_name),
                            p.parameter_name()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" AND\n");
                w.write_line("WHERE");
                w.indented().write_line(format!("{conditions}\";"));
                w.write_line("conn.Execute(cmd, this);");
                Ok(())
            })
        })
    }
}

impl ClassSection for ActiveRecord {
    fn region(&self) -> &'static str {
        "ActiveRecord"
    }

    fn applies_to(&self, entity: &Entity<'_>) -> bool {
        entity.table.table_type == TableType::Table && entity.has_primary_key()
    }

    fn emit(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        self.save(writer, entity)?;
        writer.blank_line();
        self.insert(writer, entity)?;
        writer.blank_line();
        self.update(writer, entity)
    }
}

fn column_list(columns: &[&Property<'_>], render: impl Fn(&Property<'_>) -> String) -> String {
    columns
        .iter()
        .map(|p| render(p))
        .collect::<Vec<_>>()
        .join(",\n")
}
