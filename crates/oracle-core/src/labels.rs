//! Label table resolving branch targets to instruction indices.

use std::collections::HashMap;

use crate::{Fault, Instruction, Program};

/// Map from label text to the index of its `Label` marker.
///
/// A label defined more than once resolves to its last definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelTable {
    offsets: HashMap<String, usize>,
}

impl LabelTable {
    /// Scans `program` once, recording each label marker's index.
    #[must_use]
    pub fn from_program(program: &Program) -> Self {
        let offsets = program
            .iter()
            .enumerate()
            .filter_map(|(index, instruction)| match instruction {
                Instruction::Label(name) => Some((name.clone(), index)),
                _ => None,
            })
            .collect();

        Self { offsets }
    }

    /// Resolves `label` to its instruction index.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::MissingLabel`] when the program never defines `label`.
    pub fn resolve(&self, label: &str) -> Result<usize, Fault> {
        self.offsets
            .get(label)
            .copied()
            .ok_or_else(|| Fault::MissingLabel(label.to_string()))
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` when the program defines no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::LabelTable;
    use crate::{Fault, Instruction, Program};

    fn label(name: &str) -> Instruction {
        Instruction::Label(name.into())
    }

    #[test]
    fn labels_resolve_to_their_marker_index() {
        let program: Program = vec![
            Instruction::Comment("head".into()),
            label("a"),
            Instruction::Comment("body".into()),
            label("b"),
        ]
        .into();

        let table = LabelTable::from_program(&program);

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("a"), Ok(1));
        assert_eq!(table.resolve("b"), Ok(3));
    }

    #[test]
    fn undefined_label_is_missing() {
        let table = LabelTable::from_program(&Program::new());

        assert!(table.is_empty());
        assert_eq!(
            table.resolve("nowhere"),
            Err(Fault::MissingLabel("nowhere".into()))
        );
    }

    #[test]
    fn duplicate_definition_resolves_to_the_last_one() {
        let program: Program = vec![label("x"), label("y"), label("x")].into();

        assert_eq!(LabelTable::from_program(&program).resolve("x"), Ok(2));
    }
}
