//! Value equality: Equals, GetHashCode and the comparison operators

use pocogen::CodeWriter;

use super::entity::Entity;
use super::section::ClassSection;
use crate::error::Result;

/// Value equality over every non-identity column
#[derive(Debug, Clone, Copy, Default)]
pub struct Equality;

impl Equality {
    fn equals(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        let class = &entity.class_name;
        writer.with_block("public override bool Equals(object obj)", |w| -> Result<()> {
            w.write_line(format!(
                "
                if (ReferenceEquals(null, obj))
                {{
                    return false;
                }}
                if (ReferenceEquals(this, obj))
                {{
                    return true;
                }}
                {class} other = obj as {class};
                if (other == null) return false;
                "
            ));
            for property in entity.compared() {
                let name = &property.name;
                w.write_line(format!(
                    "
                    if ({name} != other.{name})
                        return false;"
                ));
            }
            w.write_line("return true;");
            Ok(())
        })
    }

    fn hash_code(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        writer.with_block("public override int GetHashCode()", |w| {
            w.with_block("unchecked", |w| -> Result<()> {
                w.write_line("int hash = 17;");
                for property in entity.compared() {
                    w.write_line(format!(
                        "hash = hash * 23 + ({name} == {default} ? 0 : {name}.GetHashCode());",
                        name = property.name,
                        default = property.ty.default_literal()
                    ));
                }
                w.write_line("return hash;");
                Ok(())
            })
        })
    }

    fn operators(&self, writer: &mut CodeWriter, entity: &Entity<'_>) {
        let class = &entity.class_name;
        writer.write_line(format!(
            "
            public static bool operator ==({class} left, {class} right)
            {{
                return Equals(left, right);
            }}

            public static bool operator !=({class} left, {class} right)
            {{
                return !Equals(left, right);
            }}
            "
        ));
    }
}

impl ClassSection for Equality {
    fn region(&self) -> &'static str {
        "Equals/GetHashCode"
    }

    fn emit(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()> {
        self.equals(writer, entity)?;
        writer.blank_line();
        self.hash_code(writer, entity)?;
        writer.blank_line();
        self.operators(writer, entity);
        Ok(())
    }
}
