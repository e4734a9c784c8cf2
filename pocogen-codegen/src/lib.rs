//! pocogen-codegen: Generate C# POCO classes from a logical database schema
//!
//! This crate provides both a CLI tool and a library for generating C# entity
//! classes from a JSON description of a SQL Server schema. For every table it
//! generates:
//!
//! - A `partial` class with one auto-property per column, annotated with
//!   `[Key]`, `[Column]` and `[Table]` where the names need it
//! - Optional Dapper-based `Save()`/`Insert()`/`Update()` methods
//! - Optional `Equals`/`GetHashCode` overrides and `==`/`!=` operators
//!
//! Files are rendered in memory by the `pocogen` engine and only written once
//! every class has been generated.
//!
//! # Usage in build.rs
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.pocogen]
//! schema_file = "schema.json"
//! output_dir = "generated/Models"
//! namespace = "AdventureWorks.Models"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     pocogen_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate POCOs");
//! }
//! ```
//!
//! # Programmatic Configuration
//!
//! ```rust,ignore
//! fn main() {
//!     pocogen_codegen::CodegenBuilder::new("schema.json")
//!         .output_dir("generated/Models")
//!         .namespace("AdventureWorks.Models")
//!         .single_file()
//!         .generate()
//!         .expect("Failed to generate POCOs");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! pocogen --schema schema.json --output ./Models --namespace AdventureWorks.Models generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod schema;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use codegen::CodeGenerator;
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Main entry point for code generation.
///
/// Returns the destination of every file, written or (in dry-run mode) planned.
pub fn generate(config: &CodegenConfig) -> Result<Vec<PathBuf>> {
    info!("Reading schema: {:?}", config.schema_file);
    let schema = schema::load_schema(&config.schema_file)?;
    info!("Found {} tables", schema.tables.len());

    let tables = schema::filter_tables(schema.tables, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    let context = CodeGenerator::new(config).render(&tables)?;

    if config.dry_run {
        let planned = context.plan(&config.output_dir)?;
        info!("Dry run: {} files planned", planned.len());
        return Ok(planned.into_iter().map(|file| file.path).collect());
    }

    let report = context.save(&config.output_dir)?;
    info!("Code generation complete: {} files", report.written.len());
    Ok(report.written)
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the destination root of the generated files
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self
    }

    /// Put every class into one file
    pub fn single_file(mut self) -> Self {
        self.config.single_file = true;
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Also generate classes for views
    pub fn include_views(mut self) -> Self {
        self.config.include_views = true;
        self
    }

    /// Generate plain classes without Save/Insert/Update
    pub fn without_active_record(mut self) -> Self {
        self.config.generate_active_record = false;
        self
    }

    /// Generate classes without Equals/GetHashCode
    pub fn without_equality(mut self) -> Self {
        self.config.generate_equals_hash_code = false;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub fn generate(self) -> Result<Vec<PathBuf>> {
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.pocogen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the JSON schema file (required)
    schema_file: Option<String>,

    /// Destination root (default: `$OUT_DIR/Models`)
    output_dir: Option<String>,

    namespace: Option<String>,

    single_file: Option<bool>,

    /// Tables to include (optional, defaults to all)
    #[serde(default)]
    include_tables: Vec<String>,

    /// Tables to exclude (optional)
    #[serde(default)]
    exclude_tables: Vec<String>,

    generate_active_record: Option<bool>,

    generate_equals_hash_code: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    pocogen: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.pocogen]` in Cargo.toml
///
/// Paths are resolved against the manifest directory; without an
/// `output_dir` the classes land in `$OUT_DIR/Models`.
///
/// ```toml
/// [package.metadata.pocogen]
/// schema_file = "schema.json"
/// namespace = "AdventureWorks.Models"
/// exclude_tables = ["ErrorLog"]
/// ```
pub fn generate_from_cargo_metadata() -> Result<Vec<PathBuf>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let cargo_toml: CargoToml = toml::from_str(&cargo_toml_content).map_err(|e| {
        CodegenError::ConfigError(format!(
            "Failed to parse {}: {}",
            cargo_toml_path.display(),
            e
        ))
    })?;

    let metadata_config = cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.pocogen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.pocogen] section in Cargo.toml".into(),
            )
        })?;

    let schema_file = metadata_config.schema_file.ok_or_else(|| {
        CodegenError::ConfigError("schema_file is required in [package.metadata.pocogen]".into())
    })?;
    let schema_path = PathBuf::from(&manifest_dir).join(&schema_file);

    let output_dir = match metadata_config.output_dir {
        Some(dir) => PathBuf::from(&manifest_dir).join(dir),
        None => std::env::var("OUT_DIR")
            .map(|dir| PathBuf::from(dir).join("Models"))
            .map_err(|_| {
                CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
            })?,
    };

    let mut builder = CodegenBuilder::new(&schema_path).output_dir(output_dir);

    if let Some(namespace) = &metadata_config.namespace {
        builder = builder.namespace(namespace);
    }
    if let Some(true) = metadata_config.single_file {
        builder = builder.single_file();
    }

    if !metadata_config.include_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .include_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.include_tables(&tables);
    }
    if !metadata_config.exclude_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .exclude_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.exclude_tables(&tables);
    }

    if let Some(false) = metadata_config.generate_active_record {
        builder = builder.without_active_record();
    }
    if let Some(false) = metadata_config.generate_equals_hash_code {
        builder = builder.without_equality();
    }

    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}
