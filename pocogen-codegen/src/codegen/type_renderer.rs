//! Column to C# type mapping

use tracing::warn;

use crate::schema::Column;

/// A CLR type that generated code can refer to
#[derive(Debug, Clone, PartialEq)]
pub enum ClrType {
    Bool,
    Byte,
    SByte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    String,
    Object,
    Bytes,
    Guid,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    /// Any other type, by full name (treated as a reference type)
    Other(String),
}

impl ClrType {
    /// Parse a CLR type name such as `System.Int32` or an assembly-qualified
    /// `System.Int32, mscorlib, Version=4.0.0.0`
    pub fn from_name(name: &str) -> ClrType {
        let name = name.split(',').next().unwrap_or(name).trim();
        let short = name.strip_prefix("System.").unwrap_or(name);
        match short {
            "Boolean" => ClrType::Bool,
            "Byte" => ClrType::Byte,
            "SByte" => ClrType::SByte,
            "Char" => ClrType::Char,
            "Int16" => ClrType::Short,
            "UInt16" => ClrType::UShort,
            "Int32" => ClrType::Int,
            "UInt32" => ClrType::UInt,
            "Int64" => ClrType::Long,
            "UInt64" => ClrType::ULong,
            "Single" => ClrType::Float,
            "Double" => ClrType::Double,
            "Decimal" => ClrType::Decimal,
            "String" => ClrType::String,
            "Object" => ClrType::Object,
            "Byte[]" => ClrType::Bytes,
            "Guid" => ClrType::Guid,
            "DateTime" => ClrType::DateTime,
            "DateTimeOffset" => ClrType::DateTimeOffset,
            "TimeSpan" => ClrType::TimeSpan,
            _ => ClrType::Other(name.to_string()),
        }
    }

    /// Infer the CLR type from a SQL Server data type
    pub fn from_sql_type(sql_type: &str) -> ClrType {
        let sql_type = sql_type.to_lowercase();
        let base = sql_type.split('(').next().unwrap_or("").trim();
        match base {
            "bit" => ClrType::Bool,
            "tinyint" => ClrType::Byte,
            "smallint" => ClrType::Short,
            "int" => ClrType::Int,
            "bigint" => ClrType::Long,
            "real" => ClrType::Float,
            "float" => ClrType::Double,
            "decimal" | "numeric" | "money" | "smallmoney" => ClrType::Decimal,
            "char" | "nchar" | "varchar" | "nvarchar" | "text" | "ntext" | "xml" | "sysname" => {
                ClrType::String
            }
            "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => ClrType::Bytes,
            "uniqueidentifier" => ClrType::Guid,
            "date" | "datetime" | "datetime2" | "smalldatetime" => ClrType::DateTime,
            "datetimeoffset" => ClrType::DateTimeOffset,
            "time" => ClrType::TimeSpan,
            "sql_variant" => ClrType::Object,
            other => ClrType::Other(other.to_string()),
        }
    }

    /// C# spelling: keyword aliases where they exist, short names otherwise
    pub fn name(&self) -> &str {
        match self {
            ClrType::Bool => "bool",
            ClrType::Byte => "byte",
            ClrType::SByte => "sbyte",
            ClrType::Char => "char",
            ClrType::Short => "short",
            ClrType::UShort => "ushort",
            ClrType::Int => "int",
            ClrType::UInt => "uint",
            ClrType::Long => "long",
            ClrType::ULong => "ulong",
            ClrType::Float => "float",
            ClrType::Double => "double",
            ClrType::Decimal => "decimal",
            ClrType::String => "string",
            ClrType::Object => "object",
            ClrType::Bytes => "byte[]",
            ClrType::Guid => "Guid",
            ClrType::DateTime => "DateTime",
            ClrType::DateTimeOffset => "DateTimeOffset",
            ClrType::TimeSpan => "TimeSpan",
            ClrType::Other(name) => name,
        }
    }

    /// Whether this is a value type (and so needs `?` to hold null)
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            ClrType::String | ClrType::Object | ClrType::Bytes | ClrType::Other(_)
        )
    }
}

/// A column's type as it appears in generated code
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedType {
    pub clr: ClrType,
    /// Value type wrapped in `Nullable<T>`
    pub nullable: bool,
}

impl RenderedType {
    /// Type as written in a declaration, e.g. `int?`
    pub fn definition(&self) -> String {
        if self.nullable {
            format!("{}?", self.clr.name())
        } else {
            self.clr.name().to_string()
        }
    }

    /// Literal of the type's default value, e.g. `default(int)` or `null`
    pub fn default_literal(&self) -> String {
        if self.nullable || !self.clr.is_value_type() {
            "null".to_string()
        } else {
            format!("default({})", self.clr.name())
        }
    }
}

/// Renders column types for one target language
pub trait TypeRenderer {
    fn render(&self, column: &Column) -> RenderedType;

    /// Whether the column can be represented at all
    fn supports(&self, column: &Column) -> bool;
}

/// C# type rules
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpTypeRenderer;

/// SQL types the generated classes leave out
const UNSUPPORTED_SQL_TYPES: &[&str] = &["hierarchyid", "geography"];

impl TypeRenderer for CSharpTypeRenderer {
    fn render(&self, column: &Column) -> RenderedType {
        let clr = match column.clr_type.as_deref() {
            Some(name) if !name.trim().is_empty() => ClrType::from_name(name),
            _ => ClrType::from_sql_type(&column.sql_data_type),
        };
        if let ClrType::Other(name) = &clr {
            warn!(
                "Column {} has unrecognized type {}, emitting it as a reference type",
                column.column_name, name
            );
        }

        // reference types are nullable already
        let nullable = column.is_nullable && clr.is_value_type();
        RenderedType { clr, nullable }
    }

    fn supports(&self, column: &Column) -> bool {
        let sql_type = column.sql_data_type.to_lowercase();
        !UNSUPPORTED_SQL_TYPES.contains(&sql_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(sql_type: &str, clr_type: Option<&str>, nullable: bool) -> Column {
        Column {
            column_name: "Value".to_string(),
            ordinal_position: 1,
            is_nullable: nullable,
            sql_data_type: sql_type.to_string(),
            clr_type: clr_type.map(str::to_string),
            ..Default::default()
        }
    }

    fn render(sql_type: &str, clr_type: Option<&str>, nullable: bool) -> RenderedType {
        CSharpTypeRenderer.render(&make_column(sql_type, clr_type, nullable))
    }

    #[test]
    fn test_clr_names() {
        assert_eq!(ClrType::from_name("System.Int32"), ClrType::Int);
        assert_eq!(
            ClrType::from_name("System.Int64, mscorlib, Version=4.0.0.0"),
            ClrType::Long
        );
        assert_eq!(ClrType::from_name("System.Byte[]"), ClrType::Bytes);
        assert_eq!(
            ClrType::from_name("Microsoft.SqlServer.Types.SqlGeography"),
            ClrType::Other("Microsoft.SqlServer.Types.SqlGeography".to_string())
        );
    }

    #[test]
    fn test_sql_type_inference() {
        assert_eq!(ClrType::from_sql_type("nvarchar(50)"), ClrType::String);
        assert_eq!(ClrType::from_sql_type("BIT"), ClrType::Bool);
        assert_eq!(ClrType::from_sql_type("money"), ClrType::Decimal);
        assert_eq!(ClrType::from_sql_type("uniqueidentifier"), ClrType::Guid);
        assert_eq!(ClrType::from_sql_type("datetime2"), ClrType::DateTime);
    }

    #[test]
    fn test_nullable_value_type() {
        let ty = render("int", Some("System.Int32"), true);
        assert_eq!(ty.definition(), "int?");
        assert_eq!(ty.default_literal(), "null");
    }

    #[test]
    fn test_non_nullable_value_type() {
        let ty = render("datetime", None, false);
        assert_eq!(ty.definition(), "DateTime");
        assert_eq!(ty.default_literal(), "default(DateTime)");
    }

    #[test]
    fn test_reference_types_are_never_wrapped() {
        let ty = render("nvarchar", Some("System.String"), true);
        assert_eq!(ty.definition(), "string");
        assert_eq!(ty.default_literal(), "null");

        let ty = render("varbinary", None, true);
        assert_eq!(ty.definition(), "byte[]");
    }

    #[test]
    fn test_unsupported_columns() {
        assert!(!CSharpTypeRenderer.supports(&make_column("hierarchyid", None, false)));
        assert!(!CSharpTypeRenderer.supports(&make_column("Geography", None, true)));
        assert!(CSharpTypeRenderer.supports(&make_column("int", None, false)));
    }
}
