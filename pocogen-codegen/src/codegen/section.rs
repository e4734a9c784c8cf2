//! Class sections composed by the code generator

use pocogen::CodeWriter;

use super::entity::Entity;
use crate::error::Result;

/// One `#region` of a generated class.
///
/// The generator wraps each applicable section in `#region`/`#endregion`
/// markers and separates consecutive sections with a blank line.
pub trait ClassSection {
    /// Region name, written after `#region` and `#endregion`
    fn region(&self) -> &'static str;

    /// Whether the section is emitted for this entity
    fn applies_to(&self, _entity: &Entity<'_>) -> bool {
        true
    }

    /// Write the section body at the writer's current depth
    fn emit(&self, writer: &mut CodeWriter, entity: &Entity<'_>) -> Result<()>;
}

/// Write every applicable section, each inside its region markers
pub fn emit_sections(
    writer: &mut CodeWriter,
    entity: &Entity<'_>,
    sections: &[Box<dyn ClassSection>],
) -> Result<()> {
    let mut first = true;
    for section in sections.iter().filter(|s| s.applies_to(entity)) {
        if !first {
            writer.blank_line();
        }
        first = false;

        writer.write_line(format!("#region {}", section.region()));
        section.emit(writer, entity)?;
        writer.write_line(format!("#endregion {}", section.region()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Table, TableType};

    struct Fixed(&'static str, bool);

    impl ClassSection for Fixed {
        fn region(&self) -> &'static str {
            self.0
        }

        fn applies_to(&self, _entity: &Entity<'_>) -> bool {
            self.1
        }

        fn emit(&self, writer: &mut CodeWriter, _entity: &Entity<'_>) -> Result<()> {
            writer.write_line(format!("// {}", self.0));
            Ok(())
        }
    }

    struct Always;

    impl ClassSection for Always {
        fn region(&self) -> &'static str {
            "Always"
        }

        fn emit(&self, _writer: &mut CodeWriter, _entity: &Entity<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn table() -> Table {
        Table {
            table_name: "T".to_string(),
            table_schema: "dbo".to_string(),
            table_type: TableType::View,
            columns: vec![],
        }
    }

    #[test]
    fn test_sections_apply_by_default() {
        let table = table();
        let entity = Entity {
            table: &table,
            class_name: "T".to_string(),
            properties: vec![],
        };
        assert!(Always.applies_to(&entity));
    }

    #[test]
    fn test_sections_are_separated_and_filtered() {
        let table = table();
        let entity = Entity {
            table: &table,
            class_name: "T".to_string(),
            properties: vec![],
        };
        let sections: Vec<Box<dyn ClassSection>> = vec![
            Box::new(Fixed("A", true)),
            Box::new(Fixed("Skipped", false)),
            Box::new(Fixed("B", true)),
        ];

        let mut writer = CodeWriter::new();
        emit_sections(&mut writer, &entity, &sections).unwrap();
        assert_eq!(
            writer.as_str(),
            "#region A\n// A\n#endregion A\n\n#region B\n// B\n#endregion B\n"
        );
    }
}
