//! Main code generator orchestrator

use pocogen::{CodeWriter, OutputContext};
use tracing::{debug, info};

use super::active_record::ActiveRecord;
use super::entity::Entity;
use super::equality::Equality;
use super::members::Members;
use super::naming::{
    assign_class_names, csharp_string, csharp_verbatim, file_name_for_class, is_default_schema,
};
use super::section::{emit_sections, ClassSection};
use super::type_renderer::{CSharpTypeRenderer, TypeRenderer};
use crate::config::CodegenConfig;
use crate::error::Result;
use crate::schema::Table;

const USINGS: &[&str] = &[
    "System",
    "System.Collections.Generic",
    "System.ComponentModel.DataAnnotations",
    "System.ComponentModel.DataAnnotations.Schema",
    "System.Linq",
];

/// Renders POCO classes for a set of tables into an [`OutputContext`]
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
    renderer: &'a dyn TypeRenderer,
    sections: Vec<Box<dyn ClassSection>>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self::with_renderer(config, &CSharpTypeRenderer)
    }

    /// Create a code generator with a custom type renderer
    pub fn with_renderer(config: &'a CodegenConfig, renderer: &'a dyn TypeRenderer) -> Self {
        let mut sections: Vec<Box<dyn ClassSection>> = vec![Box::new(Members)];
        if config.generate_active_record {
            sections.push(Box::new(ActiveRecord::new(config.default_schema.clone())));
        }
        if config.generate_equals_hash_code {
            sections.push(Box::new(Equality));
        }
        Self {
            config,
            renderer,
            sections,
        }
    }

    /// Build the entities for `tables`, sorted by class name
    pub fn entities<'t>(&self, tables: &'t [Table]) -> Result<Vec<Entity<'t>>> {
        let policy = self.config.naming_policy();
        let selected: Vec<&Table> = tables
            .iter()
            .filter(|t| self.config.include_views || !t.is_view())
            .collect();

        let mut entities = assign_class_names(&selected, &self.config.namespace, &policy)?
            .into_iter()
            .map(|(class_name, table)| Entity::build(table, class_name, &policy, self.renderer))
            .collect::<Result<Vec<_>>>()?;
        entities.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        Ok(entities)
    }

    /// Render every file into a fresh output context. Nothing touches disk.
    pub fn render(&self, tables: &[Table]) -> Result<OutputContext> {
        let entities = self.entities(tables)?;
        info!("Generating {} classes", entities.len());

        let mut context = OutputContext::with_indent_unit(self.config.indent_unit());

        if self.config.generate_active_record {
            let writer = context.create(&self.config.connection_factory_file)?;
            self.write_connection_factory(writer)?;
        }

        if self.config.single_file {
            let writer = context.create(&self.config.single_file_name)?;
            self.write_usings(writer);
            writer.with_block(format!("namespace {}", self.config.namespace), |w| -> Result<()> {
                for (i, entity) in entities.iter().enumerate() {
                    if i > 0 {
                        w.blank_line();
                    }
                    self.write_class(w, entity)?;
                }
                Ok(())
            })?;
        } else {
            for entity in &entities {
                let writer = context.create(&file_name_for_class(&entity.class_name))?;
                self.write_usings(writer);
                writer.with_block(format!("namespace {}", self.config.namespace), |w| {
                    self.write_class(w, entity)
                })?;
            }
        }

        Ok(context)
    }

    fn write_usings(&self, writer: &mut CodeWriter) {
        for using in USINGS {
            writer.write_line(format!("using {using};"));
        }
        if self.config.generate_active_record {
            writer.write_line("using Dapper;");
        }
        writer.blank_line();
    }

    fn write_class(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        let table = entity.table;
        debug!(
            "Generating {}.{} -> {}",
            table.table_schema, table.table_name, entity.class_name
        );

        if !is_default_schema(table, &self.config.default_schema) {
            writer.write_line(format!(
                "[Table(\"{}\", Schema = \"{}\")]",
                csharp_string(&table.table_name),
                csharp_string(&table.table_schema)
            ));
        } else if entity.class_name.trim_start_matches('@').to_lowercase()
            != table.table_name.to_lowercase()
        {
            writer.write_line(format!("[Table(\"{}\")]", csharp_string(&table.table_name)));
        }

        writer.with_block(format!("public partial class {}", entity.class_name), |w| {
            emit_sections(w, entity, &self.sections)
        })
    }

    fn write_connection_factory(&self, writer: &mut CodeWriter) -> Result<()> {
        writer
            .write_line("using System;")
            .write_line("using System.Data;")
            .write_line("using System.Data.SqlClient;")
            .blank_line();
        writer.with_block(format!("namespace {}", self.config.namespace), |w| {
            w.with_block("public class IDbConnectionFactory", |w| {
                w.with_block("public static IDbConnection CreateConnection()", |w| -> Result<()> {
                    w.write_line(format!(
                        "string connectionString = @\"{}\";",
                        csharp_verbatim(&self.config.connection_string)
                    ));
                    w.blank_line();
                    w.write_line("return new SqlConnection(connectionString);");
                    Ok(())
                })
            })
        })
    }
}
