//! Validating instruction builder.
//!
//! The builder is the surface a code generator under test talks to. Every
//! `add_*` call normalizes its loosely-typed arguments, validates them, and
//! appends exactly one instruction, or fails without appending anything.

use oracle_core::{ConditionSet, Fault, Instruction, Operand, Program, RawValue, Register, Word};

use crate::names::{LabelPair, LabelScope, NameGenerator};

/// Default maximum number of instructions in one program.
pub const DEFAULT_INSTRUCTION_CAP: usize = 100_000;

/// Default symmetric bound on immediate operands (`-15..=15`).
pub const DEFAULT_IMMEDIATE_BOUND: Word = 15;

/// Emission limits for one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BuilderConfig {
    /// Maximum program length; emission beyond it fails with `TooMuchCode`.
    pub instruction_cap: usize,
    /// Immediates must lie in `-immediate_bound..=immediate_bound`.
    pub immediate_bound: Word,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            instruction_cap: DEFAULT_INSTRUCTION_CAP,
            immediate_bound: DEFAULT_IMMEDIATE_BOUND,
        }
    }
}

impl BuilderConfig {
    /// Returns `true` when `value` fits the immediate field.
    ///
    /// A negative bound admits nothing.
    #[must_use]
    pub const fn immediate_fits(&self, value: Word) -> bool {
        match self.immediate_bound.checked_neg() {
            Some(low) => low <= value && value <= self.immediate_bound,
            None => false,
        }
    }
}

/// Stateful emitter accumulating one program.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    program: Program,
    names: NameGenerator,
    config: BuilderConfig,
}

impl Builder {
    /// Creates a builder with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given limits.
    #[must_use]
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Limits in effect.
    #[must_use]
    pub const fn config(&self) -> BuilderConfig {
        self.config
    }

    /// Returns a fresh temporary register, unique within this builder.
    pub fn new_temporary(&mut self) -> Register {
        self.names.temporary()
    }

    /// Returns fresh begin/end labels for a loop.
    pub fn new_loop_labels(&mut self) -> LabelPair {
        self.names.label_pair(LabelScope::Loop)
    }

    /// Returns fresh negative-arm/end labels for a conditional.
    pub fn new_conditional_labels(&mut self) -> LabelPair {
        self.names.label_pair(LabelScope::Conditional)
    }

    /// Returns fresh negative-arm/end labels for an equality test.
    pub fn new_equality_labels(&mut self) -> LabelPair {
        self.names.label_pair(LabelScope::Equality)
    }

    /// Appends a label marker.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full and
    /// [`Fault::NotALabel`] when `name` is not text.
    pub fn add_label(&mut self, name: impl Into<RawValue>) -> Result<(), Fault> {
        self.check_capacity()?;
        let name = expect_label(name.into())?;
        self.emit(Instruction::Label(name));
        Ok(())
    }

    /// Appends a branch on a textual condition such as `"nz"`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full,
    /// [`Fault::UnexpectedCondition`] when `condition` contains anything but
    /// `n`, `z`, `p`, and [`Fault::NotALabel`] when `label` is not text.
    pub fn add_branch(&mut self, condition: &str, label: impl Into<RawValue>) -> Result<(), Fault> {
        self.check_capacity()?;
        let condition = condition.parse::<ConditionSet>()?;
        self.push_branch(condition, label.into())
    }

    /// Appends a branch on an already-typed condition set.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full and
    /// [`Fault::NotALabel`] when `label` is not text.
    pub fn add_branch_set(
        &mut self,
        condition: ConditionSet,
        label: impl Into<RawValue>,
    ) -> Result<(), Fault> {
        self.check_capacity()?;
        self.push_branch(condition, label.into())
    }

    /// Appends an unconditional jump.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::add_branch_set`].
    pub fn add_unconditional_jump(&mut self, label: impl Into<RawValue>) -> Result<(), Fault> {
        self.add_branch_set(ConditionSet::ALWAYS, label)
    }

    /// Appends `dest := !src`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full and
    /// [`Fault::InvalidRegisterName`] when either argument is not a register.
    pub fn add_not(
        &mut self,
        dest: impl Into<RawValue>,
        src: impl Into<RawValue>,
    ) -> Result<(), Fault> {
        self.check_capacity()?;
        let dest = expect_register(dest.into())?;
        let src = expect_register(src.into())?;
        self.emit(Instruction::Not { dest, src });
        Ok(())
    }

    /// Appends `dest := src + operand`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full,
    /// [`Fault::InvalidRegisterName`] when `dest` or `src` is not a register,
    /// and [`Fault::OverflowConstant`] when `operand` is an immediate outside
    /// the configured bound.
    pub fn add_add(
        &mut self,
        dest: impl Into<RawValue>,
        src: impl Into<RawValue>,
        operand: impl Into<RawValue>,
    ) -> Result<(), Fault> {
        self.check_capacity()?;
        let dest = expect_register(dest.into())?;
        let src = expect_register(src.into())?;
        let operand = self.expect_operand(operand.into())?;
        self.emit(Instruction::Add { dest, src, operand });
        Ok(())
    }

    /// Appends `dest := src & operand`.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::add_add`].
    pub fn add_and(
        &mut self,
        dest: impl Into<RawValue>,
        src: impl Into<RawValue>,
        operand: impl Into<RawValue>,
    ) -> Result<(), Fault> {
        self.check_capacity()?;
        let dest = expect_register(dest.into())?;
        let src = expect_register(src.into())?;
        let operand = self.expect_operand(operand.into())?;
        self.emit(Instruction::And { dest, src, operand });
        Ok(())
    }

    /// Appends a comment, inert at run time.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::TooMuchCode`] when the program is full.
    pub fn add_comment(&mut self, text: impl Into<String>) -> Result<(), Fault> {
        self.check_capacity()?;
        self.emit(Instruction::Comment(text.into()));
        Ok(())
    }

    /// Number of instructions emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.program.len()
    }

    /// Returns `true` before the first emission.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Program emitted so far.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Consumes the builder and returns its program.
    #[must_use]
    pub fn into_program(self) -> Program {
        self.program
    }

    fn check_capacity(&self) -> Result<(), Fault> {
        if self.program.len() >= self.config.instruction_cap {
            return Err(Fault::TooMuchCode(self.config.instruction_cap));
        }
        Ok(())
    }

    fn push_branch(&mut self, condition: ConditionSet, label: RawValue) -> Result<(), Fault> {
        let target = expect_label(label)?;
        self.emit(Instruction::Branch { condition, target });
        Ok(())
    }

    fn expect_operand(&self, raw: RawValue) -> Result<Operand, Fault> {
        let operand = Operand::normalize(raw)?;
        match operand {
            Operand::Immediate(value) if !self.config.immediate_fits(value) => {
                Err(Fault::OverflowConstant(value))
            }
            operand => Ok(operand),
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.program.push(instruction);
    }
}

fn expect_register(raw: RawValue) -> Result<Register, Fault> {
    let shown = raw.to_string();
    match Operand::normalize(raw) {
        Ok(Operand::Register(register)) => Ok(register),
        Ok(Operand::Immediate(_)) | Err(Fault::OverflowConstant(_)) => {
            Err(Fault::InvalidRegisterName(shown))
        }
        Err(fault) => Err(fault),
    }
}

fn expect_label(raw: RawValue) -> Result<String, Fault> {
    match raw {
        RawValue::Text(name) => Ok(name),
        other => Err(Fault::NotALabel(other.to_string())),
    }
}
