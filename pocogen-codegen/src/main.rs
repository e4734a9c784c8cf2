//! CLI entry point for pocogen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pocogen_codegen::config::CodegenConfig;
use pocogen_codegen::schema::{filter_tables, load_schema};
use pocogen_codegen::CodeGenerator;

#[derive(Parser)]
#[command(name = "pocogen")]
#[command(about = "Generate C# POCO classes from a logical database schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to JSON schema file (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// C# namespace of the generated classes (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Put every class into a single file
    #[arg(long)]
    single_file: bool,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all classes (default)
    Generate,
    /// Inspect schema (show parsed tables and derived names)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if cli.single_file {
        config.single_file = true;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Validate configuration
    config.validate()?;

    if let Some(Commands::Inspect) = &cli.command {
        return inspect_schema(&config);
    }

    info!("Generating code from schema: {:?}", config.schema_file);
    let paths = pocogen_codegen::generate(&config)?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
        for path in &paths {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    info!("Code generation completed successfully");
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let schema = load_schema(&config.schema_file)?;
    let tables = filter_tables(schema.tables, &config.include_tables, &config.exclude_tables);
    let entities = CodeGenerator::new(config).entities(&tables)?;

    println!("Parsed {} tables:\n", tables.len());
    for table in &tables {
        let entity = entities.iter().find(|e| std::ptr::eq(e.table, table));
        match entity {
            Some(entity) => println!(
                "{}: {}.{} -> class {}",
                if table.is_view() { "View" } else { "Table" },
                table.table_schema,
                table.table_name,
                entity.class_name
            ),
            None => println!("View: {}.{} (skipped)", table.table_schema, table.table_name),
        }

        println!("  Columns:");
        for col in table.columns_by_ordinal() {
            let nullable = if col.is_nullable { "NULL" } else { "NOT NULL" };
            let mut flags = Vec::new();
            if col.is_primary_key_member {
                flags.push("PK");
            }
            if col.is_identity {
                flags.push("IDENTITY");
            }
            if col.is_row_guid {
                flags.push("ROWGUID");
            }
            if col.is_computed {
                flags.push("COMPUTED");
            }
            let property = entity
                .and_then(|e| {
                    e.properties
                        .iter()
                        .find(|p| std::ptr::eq(p.column, col))
                })
                .map(|p| format!("{} {}", p.ty.definition(), p.name))
                .unwrap_or_else(|| "(not generated)".to_string());
            println!(
                "    - {} {} {} {} -> {}",
                col.column_name,
                col.sql_data_type,
                nullable,
                flags.join(" "),
                property
            );
        }
        println!();
    }

    Ok(())
}
