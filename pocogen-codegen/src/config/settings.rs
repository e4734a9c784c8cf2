//! Configuration settings for pocogen-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};
use pocogen::{FragmentCasing, NamingPolicy, CSHARP_RESERVED_WORDS};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the JSON schema file
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Directory all destination keys are resolved against
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// C# namespace of the generated classes
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Put every class into one file
    #[serde(default = "default_single_file")]
    pub single_file: bool,

    /// File name used in single-file mode
    #[serde(default = "default_single_file_name")]
    pub single_file_name: String,

    /// Whether to generate Save/Insert/Update and the connection factory
    #[serde(default = "default_generate_active_record")]
    pub generate_active_record: bool,

    /// Whether to generate Equals/GetHashCode and equality operators
    #[serde(default = "default_generate_equals_hash_code")]
    pub generate_equals_hash_code: bool,

    /// Whether views get a POCO (never with ActiveRecord methods)
    #[serde(default = "default_include_views")]
    pub include_views: bool,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Schema that needs no qualifier in `[Table]` attributes and SQL
    #[serde(default = "default_default_schema")]
    pub default_schema: String,

    /// Destination key of the connection factory file
    #[serde(default = "default_connection_factory_file")]
    pub connection_factory_file: String,

    /// Connection string embedded in the connection factory
    #[serde(default = "default_connection_string")]
    pub connection_string: String,

    /// Spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Keep all-uppercase words (`ID`, `SSN`) as they are in property names
    #[serde(default = "default_preserve_acronyms")]
    pub preserve_acronyms: bool,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_namespace() -> String {
    defaults::NAMESPACE.to_string()
}
fn default_single_file() -> bool {
    defaults::SINGLE_FILE
}
fn default_single_file_name() -> String {
    defaults::SINGLE_FILE_NAME.to_string()
}
fn default_generate_active_record() -> bool {
    defaults::GENERATE_ACTIVE_RECORD
}
fn default_generate_equals_hash_code() -> bool {
    defaults::GENERATE_EQUALS_HASH_CODE
}
fn default_include_views() -> bool {
    defaults::INCLUDE_VIEWS
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_default_schema() -> String {
    defaults::DEFAULT_SCHEMA.to_string()
}
fn default_connection_factory_file() -> String {
    defaults::CONNECTION_FACTORY_FILE.to_string()
}
fn default_connection_string() -> String {
    defaults::CONNECTION_STRING.to_string()
}
fn default_indent_size() -> usize {
    defaults::INDENT_SIZE
}
fn default_preserve_acronyms() -> bool {
    defaults::PRESERVE_ACRONYMS
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            output_dir: default_output_dir(),
            namespace: default_namespace(),
            single_file: default_single_file(),
            single_file_name: default_single_file_name(),
            generate_active_record: default_generate_active_record(),
            generate_equals_hash_code: default_generate_equals_hash_code(),
            include_views: default_include_views(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            default_schema: default_default_schema(),
            connection_factory_file: default_connection_factory_file(),
            connection_string: default_connection_string(),
            indent_size: default_indent_size(),
            preserve_acronyms: default_preserve_acronyms(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("pocogen").required(false));
        }

        // Override with environment variables (POCOGEN_*), e.g. POCOGEN_SINGLE_FILE
        builder = builder.add_source(
            Environment::with_prefix("POCOGEN")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Indentation unit handed to the output context
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_size)
    }

    /// Naming rules for class and property names
    pub fn naming_policy(&self) -> NamingPolicy {
        let casing = if self.preserve_acronyms {
            FragmentCasing::PreserveAcronyms
        } else {
            FragmentCasing::TitleCase
        };
        NamingPolicy::new(CSHARP_RESERVED_WORDS, casing)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if self.namespace.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "namespace must not be empty".into(),
            ));
        }

        if self.indent_size == 0 {
            return Err(CodegenError::ValidationError(
                "indent_size must be at least 1".into(),
            ));
        }

        if self.single_file && self.single_file_name.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "single_file_name is required when single_file is true".into(),
            ));
        }

        if self.generate_active_record && self.connection_factory_file.trim().is_empty() {
            return Err(CodegenError::ValidationError(
                "connection_factory_file is required when generate_active_record is true"
                    .into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.include_tables, "*");
        assert_eq!(config.namespace, "MyProject.Models");
        assert!(!config.single_file);
        assert!(config.generate_active_record);
        assert!(config.generate_equals_hash_code);
        assert_eq!(config.indent_unit(), "    ");
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_schema() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_indent() {
        let schema = tempfile::NamedTempFile::new().unwrap();
        let mut config = CodegenConfig::default_with_schema(schema.path().to_path_buf());
        assert!(config.validate().is_ok());

        config.indent_size = 0;
        assert!(matches!(
            config.validate(),
            Err(CodegenError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            schema_file = "schema.json"
            namespace = "AdventureWorks.Models"
            single_file = true
            preserve_acronyms = false
            log_level = "debug"
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.namespace, "AdventureWorks.Models");
        assert!(config.single_file);
        assert_eq!(config.single_file_name, "POCOs.Generated.cs");
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.naming_policy().casing, FragmentCasing::TitleCase);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pocogen.toml");
        std::fs::write(&path, "schema_file = \"db.json\"\nindent_size = 2\n").unwrap();

        let config = CodegenConfig::from_file(&path).unwrap();
        assert_eq!(config.schema_file, PathBuf::from("db.json"));
        assert_eq!(config.indent_unit(), "  ");
    }
}
