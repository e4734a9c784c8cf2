//! Property declarations

use pocogen::CodeWriter;

use super::entity::Entity;
use super::naming::csharp_string;
use super::section::ClassSection;
use crate::error::Result;

/// One auto-property per column, key columns first
#[derive(Debug, Clone, Copy, Default)]
pub struct Members;

impl ClassSection for Members {
    fn region(&self) -> &'static str {
        "Members"
    }

    fn emit(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        for property in entity.members() {
            if property.column.is_primary_key_member {
                writer.write_line("[Key]");
            }
            if property.is_renamed() {
                writer.write_line(format!(
                    "[Column(\"{}\")]",
                    csharp_string(&property.column.column_name)
                ));
            }
            writer.write_line(format!(
                "public {} {} {{ get; set; }}",
                property.ty.definition(),
                property.name
            ));
        }
        Ok(())
    }
}
