//! Instruction set and program container.

use std::fmt;

use crate::{ConditionSet, Operand, Register};

/// One machine instruction. Branches carry symbolic label text, never addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// Position marker named by a label.
    Label(String),
    /// Free-form comment, inert at run time.
    Comment(String),
    /// `dest := src & operand`, with zero propagation over uninitialized sides.
    And {
        /// Destination register.
        dest: Register,
        /// First source register.
        src: Register,
        /// Second source, register or immediate.
        operand: Operand,
    },
    /// `dest := src + operand`.
    Add {
        /// Destination register.
        dest: Register,
        /// First source register.
        src: Register,
        /// Second source, register or immediate.
        operand: Operand,
    },
    /// `dest := !src`.
    Not {
        /// Destination register.
        dest: Register,
        /// Source register.
        src: Register,
    },
    /// Jump to `target` when the condition flag satisfies `condition`.
    Branch {
        /// Condition members; empty or full means unconditional.
        condition: ConditionSet,
        /// Label text to resolve.
        target: String,
    },
}

impl Instruction {
    /// Returns `true` for label and comment markers.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Label(_) | Self::Comment(_))
    }

    /// Returns the register this instruction writes, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<&Register> {
        match self {
            Self::And { dest, .. } | Self::Add { dest, .. } | Self::Not { dest, .. } => {
                Some(dest)
            }
            Self::Label(_) | Self::Comment(_) | Self::Branch { .. } => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(name) => write!(f, "{name}:"),
            Self::Comment(text) => write!(f, "; {text}"),
            Self::And { dest, src, operand } => write!(f, "AND {dest}, {src}, {operand}"),
            Self::Add { dest, src, operand } => write!(f, "ADD {dest}, {src}, {operand}"),
            Self::Not { dest, src } => write!(f, "NOT {dest}, {src}"),
            Self::Branch { condition, target } if condition.is_unconditional() => {
                write!(f, "BR {target}")
            }
            Self::Branch { condition, target } => write!(f, "BR{condition} {target}"),
        }
    }
}

/// Ordered, append-only instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Program {
    instructions: Vec<Instruction>,
}

/// One numbered row of a program listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Instruction index within the program.
    pub index: usize,
    /// Assembly-style rendering of the instruction.
    pub text: String,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Appends one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` when the program holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates instructions in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Renders the program as numbered assembly rows, for debugging only.
    #[must_use]
    pub fn listing(&self) -> Vec<ListingRow> {
        self.instructions
            .iter()
            .enumerate()
            .map(|(index, instruction)| ListingRow {
                index,
                text: instruction.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.listing() {
            if matches!(self.instructions[row.index], Instruction::Label(_)) {
                writeln!(f, "{:>5}  {}", row.index, row.text)?;
            } else {
                writeln!(f, "{:>5}      {}", row.index, row.text)?;
            }
        }
        Ok(())
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
