//! Instruction execution pipeline.
//!
//! Execution is split in two phases so faults are precise:
//! 1. [`execute_instruction`] reads sources, computes the result, and
//!    resolves any branch target into an [`ExecuteState`] without touching
//!    the machine state.
//! 2. [`commit_execution`] writes the destination register, updates the
//!    condition flag, and advances the program counter.
//!
//! A faulting instruction therefore leaves no partial side effects.

mod helpers;

pub use helpers::{and_with_zero_propagation, resolve_operand};

use crate::{Fault, Instruction, LabelTable, MachineState, Register, Word};

/// Side effects of one instruction, pending commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Register to write and its new value.
    pub dest: Option<(Register, Word)>,
    /// Program counter override from a taken branch.
    pub next_pc: Option<usize>,
}

impl ExecuteState {
    fn write(dest: &Register, value: Word) -> Self {
        Self {
            dest: Some((dest.clone(), value)),
            next_pc: None,
        }
    }

    const fn jump(target: usize) -> Self {
        Self {
            dest: None,
            next_pc: Some(target),
        }
    }
}

/// Computes the effects of `instr` against `state` without committing them.
///
/// # Errors
///
/// Returns [`Fault::UninitializedRegister`] when a required source (or the
/// condition flag of a conditional branch) was never written, and
/// [`Fault::MissingLabel`] when a taken branch targets an undefined label.
pub fn execute_instruction(
    instr: &Instruction,
    state: &MachineState,
    labels: &LabelTable,
) -> Result<ExecuteState, Fault> {
    match instr {
        Instruction::Label(_) | Instruction::Comment(_) => Ok(ExecuteState::default()),
        Instruction::Not { dest, src } => {
            let value = state.read(src)?;
            Ok(ExecuteState::write(dest, !value))
        }
        Instruction::Add { dest, src, operand } => {
            let left = state.read(src)?;
            let right = resolve_operand(operand, state)?;
            Ok(ExecuteState::write(dest, left.wrapping_add(right)))
        }
        Instruction::And { dest, src, operand } => {
            let value =
                and_with_zero_propagation(state.read(src), resolve_operand(operand, state))?;
            Ok(ExecuteState::write(dest, value))
        }
        Instruction::Branch { condition, target } => {
            // Unconditional branches never consult the flag.
            let taken = condition.is_unconditional() || condition.admits(state.read_condition()?);
            if taken {
                labels.resolve(target).map(ExecuteState::jump)
            } else {
                Ok(ExecuteState::default())
            }
        }
    }
}

/// Applies pending effects and returns the next program counter.
pub fn commit_execution(state: &mut MachineState, exec: ExecuteState) -> usize {
    if let Some((register, value)) = exec.dest {
        state.write(register, value);
    }

    let next_pc = exec.next_pc.unwrap_or_else(|| state.pc() + 1);
    state.set_pc(next_pc);
    next_pc
}

#[cfg(test)]
mod tests {
    use super::{commit_execution, execute_instruction, ExecuteState};
    use crate::{
        ConditionSet, Fault, Instruction, LabelTable, MachineState, Operand, Program, Register,
    };

    fn reg(name: &str) -> Register {
        Register::new(name)
    }

    fn branch(condition: ConditionSet, target: &str) -> Instruction {
        Instruction::Branch {
            condition,
            target: target.into(),
        }
    }

    fn labels(names: &[&str]) -> LabelTable {
        let program: Program = names
            .iter()
            .map(|name| Instruction::Label((*name).to_string()))
            .collect();
        LabelTable::from_program(&program)
    }

    #[test]
    fn markers_have_no_effect() {
        let state = MachineState::default();
        let table = LabelTable::default();

        for instr in [
            Instruction::Label("x".into()),
            Instruction::Comment("y".into()),
        ] {
            assert_eq!(
                execute_instruction(&instr, &state, &table),
                Ok(ExecuteState::default())
            );
        }
    }

    #[test]
    fn not_complements_the_source() {
        let mut state = MachineState::default();
        state.write(reg("a"), 5);

        let exec = execute_instruction(
            &Instruction::Not {
                dest: reg("b"),
                src: reg("a"),
            },
            &state,
            &LabelTable::default(),
        )
        .expect("initialized source");

        assert_eq!(exec.dest, Some((reg("b"), -6)));
    }

    #[test]
    fn add_reports_the_uninitialized_operand_register() {
        let mut state = MachineState::default();
        state.write(reg("a"), 1);

        let result = execute_instruction(
            &Instruction::Add {
                dest: reg("a"),
                src: reg("a"),
                operand: Operand::Register(reg("b")),
            },
            &state,
            &LabelTable::default(),
        );

        assert_eq!(result, Err(Fault::UninitializedRegister(Some(reg("b")))));
    }

    #[test]
    fn add_wraps_instead_of_overflowing() {
        let mut state = MachineState::default();
        state.write(reg("a"), i64::MAX);

        let exec = execute_instruction(
            &Instruction::Add {
                dest: reg("a"),
                src: reg("a"),
                operand: Operand::Immediate(1),
            },
            &state,
            &LabelTable::default(),
        )
        .expect("initialized source");

        assert_eq!(exec.dest, Some((reg("a"), i64::MIN)));
    }

    #[test]
    fn and_with_uninitialized_register_and_zero_immediate_yields_zero() {
        let exec = execute_instruction(
            &Instruction::And {
                dest: reg("r1"),
                src: reg("r1"),
                operand: Operand::Immediate(0),
            },
            &MachineState::default(),
            &LabelTable::default(),
        )
        .expect("zero masks the uninitialized side");

        assert_eq!(exec.dest, Some((reg("r1"), 0)));
    }

    #[test]
    fn unconditional_branch_ignores_the_unset_flag() {
        let table = labels(&["top"]);
        let state = MachineState::default();

        for condition in [ConditionSet::ALWAYS, ConditionSet::ALL] {
            assert_eq!(
                execute_instruction(&branch(condition, "top"), &state, &table),
                Ok(ExecuteState {
                    dest: None,
                    next_pc: Some(0),
                })
            );
        }
    }

    #[test]
    fn conditional_branch_requires_the_flag() {
        assert_eq!(
            execute_instruction(
                &branch(ConditionSet::Z, "top"),
                &MachineState::default(),
                &labels(&["top"])
            ),
            Err(Fault::UninitializedRegister(None))
        );
    }

    #[test]
    fn untaken_branch_does_not_resolve_its_label() {
        let mut state = MachineState::default();
        state.write(reg("a"), 3);

        assert_eq!(
            execute_instruction(
                &branch(ConditionSet::N, "nowhere"),
                &state,
                &LabelTable::default()
            ),
            Ok(ExecuteState::default())
        );
        assert_eq!(
            execute_instruction(
                &branch(ConditionSet::P, "nowhere"),
                &state,
                &LabelTable::default()
            ),
            Err(Fault::MissingLabel("nowhere".into()))
        );
    }

    #[test]
    fn commit_applies_write_and_advances_or_jumps() {
        let mut state = MachineState::default();
        state.set_pc(4);

        let next = commit_execution(
            &mut state,
            ExecuteState {
                dest: Some((reg("a"), 2)),
                next_pc: None,
            },
        );
        assert_eq!(next, 5);
        assert_eq!(state.register("a"), Some(2));
        assert_eq!(state.condition_flag(), Some(2));

        let next = commit_execution(
            &mut state,
            ExecuteState {
                dest: None,
                next_pc: Some(1),
            },
        );
        assert_eq!(next, 1);
        assert_eq!(state.pc(), 1);
    }
}
