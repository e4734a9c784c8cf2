//! Default configuration values - single source of truth

/// Default output directory (destination root of the save)
pub const OUTPUT_DIR: &str = "./generated/Models";

/// Default C# namespace of the generated classes
pub const NAMESPACE: &str = "MyProject.Models";

/// Whether all classes go into a single file by default
pub const SINGLE_FILE: bool = false;

/// File name used in single-file mode
pub const SINGLE_FILE_NAME: &str = "POCOs.Generated.cs";

/// Whether to generate Save/Insert/Update methods by default
pub const GENERATE_ACTIVE_RECORD: bool = true;

/// Whether to generate Equals/GetHashCode/operators by default
pub const GENERATE_EQUALS_HASH_CODE: bool = true;

/// Whether views get a POCO by default
pub const INCLUDE_VIEWS: bool = false;

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Schema that needs no `[Table(..., Schema = ...)]` qualifier
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Destination key of the connection factory, relative to the output directory
pub const CONNECTION_FACTORY_FILE: &str = "../IDbConnectionFactory.cs";

/// Connection string embedded in the generated connection factory
pub const CONNECTION_STRING: &str =
    "Data Source=localhost\\SQLEXPRESS;Initial Catalog=AdventureWorks;Integrated Security=True;";

/// Spaces per indentation level
pub const INDENT_SIZE: usize = 4;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Whether all-uppercase words (`ID`, `SSN`) keep their casing in property names
pub const PRESERVE_ACRONYMS: bool = true;
