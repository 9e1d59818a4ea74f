use std::collections::BTreeMap;

use crate::{Fault, Register, Word};

/// Register file, condition flag, program counter, and step counter.
///
/// Registers absent from the map are uninitialized. The condition flag holds
/// the value last written to any register and stays unset until the first write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    registers: BTreeMap<Register, Word>,
    condition: Option<Word>,
    pc: usize,
    steps: u64,
}

impl MachineState {
    /// Returns the value of `register`, or `None` when never written.
    #[must_use]
    pub fn register(&self, register: &str) -> Option<Word> {
        self.registers.get(register).copied()
    }

    /// Reads `register`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UninitializedRegister`] when the register was never written.
    pub fn read(&self, register: &Register) -> Result<Word, Fault> {
        self.registers
            .get(register)
            .copied()
            .ok_or_else(|| Fault::UninitializedRegister(Some(register.clone())))
    }

    /// Writes `register` and mirrors the value into the condition flag.
    pub fn write(&mut self, register: Register, value: Word) {
        self.registers.insert(register, value);
        self.condition = Some(value);
    }

    /// All written registers, ordered by name.
    #[must_use]
    pub const fn registers(&self) -> &BTreeMap<Register, Word> {
        &self.registers
    }

    /// Returns `true` when any register currently holds `value`.
    #[must_use]
    pub fn holds_value(&self, value: Word) -> bool {
        self.registers.values().any(|&held| held == value)
    }

    /// Value last written to any register, or `None` before the first write.
    #[must_use]
    pub const fn condition_flag(&self) -> Option<Word> {
        self.condition
    }

    /// Reads the condition flag.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UninitializedRegister`] with no register when nothing
    /// has been written yet.
    pub const fn read_condition(&self) -> Result<Word, Fault> {
        match self.condition {
            Some(value) => Ok(value),
            None => Err(Fault::UninitializedRegister(None)),
        }
    }

    /// Index of the next instruction to execute.
    #[must_use]
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    /// Number of instructions executed so far.
    ///
    /// Never exceeds the step ceiling on a terminating run. After
    /// `InfiniteLoop` it reads `ceiling + 1`, counting the step that tripped it.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Counts one executed instruction and returns the new total.
    pub const fn count_step(&mut self) -> u64 {
        self.steps += 1;
        self.steps
    }
}
