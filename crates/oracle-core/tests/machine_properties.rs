//! Property coverage for machine semantics over hand-built programs.

use oracle_core::{
    ConditionSet, Fault, FaultKind, Instruction, Machine, MachineConfig, Operand, Program,
    Register,
};
use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn reg(name: &str) -> Register {
    Register::new(name)
}

fn load(register: &str, value: i64) -> [Instruction; 2] {
    [
        Instruction::And {
            dest: reg(register),
            src: reg(register),
            operand: Operand::Immediate(0),
        },
        Instruction::Add {
            dest: reg(register),
            src: reg(register),
            operand: Operand::Immediate(value),
        },
    ]
}

fn branch(condition: ConditionSet, target: &str) -> Instruction {
    Instruction::Branch {
        condition,
        target: target.into(),
    }
}

/// Loads `value`, branches over a marker write, and reports whether the
/// branch was taken (marker register left unwritten).
fn branch_taken(value: i64, condition: ConditionSet) -> bool {
    let mut instructions = load("r", value).to_vec();
    instructions.extend([
        branch(condition, "skip"),
        Instruction::And {
            dest: reg("marker"),
            src: reg("marker"),
            operand: Operand::Immediate(0),
        },
        Instruction::Label("skip".into()),
    ]);
    let program = Program::from(instructions);
    let mut machine = Machine::new(&program);
    machine.run().expect("branch program terminates");
    machine.register("marker").is_none()
}

proptest! {
    #[test]
    fn load_sequence_sets_register_and_flag(name in "[a-z][a-z0-9_]{0,8}", value in -15_i64..=15) {
        let program = Program::from(load(&name, value).to_vec());
        let mut machine = Machine::new(&program);
        machine.run().expect("load sequence terminates");

        prop_assert_eq!(machine.register(&name), Some(value));
        prop_assert_eq!(machine.condition_flag(), Some(value));
    }

    #[test]
    fn sign_branches_follow_the_loaded_value(value in -15_i64..=15) {
        prop_assert_eq!(branch_taken(value, ConditionSet::N), value < 0);
        prop_assert_eq!(branch_taken(value, ConditionSet::Z), value == 0);
        prop_assert_eq!(branch_taken(value, ConditionSet::P), value > 0);
    }

    #[test]
    fn fresh_machines_agree_on_final_state(values in proptest::collection::vec(-15_i64..=15, 1..8)) {
        let mut instructions = Vec::new();
        for (index, value) in values.iter().enumerate() {
            instructions.extend(load(&format!("t{index}"), *value));
        }
        instructions.push(Instruction::Add {
            dest: reg("sum"),
            src: reg("t0"),
            operand: Operand::Register(reg(&format!("t{}", values.len() - 1))),
        });
        let program = Program::from(instructions);

        let mut first = Machine::new(&program);
        let mut second = Machine::new(&program);
        let first_outcome = first.run();
        let second_outcome = second.run();

        prop_assert_eq!(first_outcome, second_outcome);
        prop_assert_eq!(first.state(), second.state());
    }
}

#[rstest]
#[case::n(ConditionSet::N, [true, false, false])]
#[case::z(ConditionSet::Z, [false, true, false])]
#[case::p(ConditionSet::P, [false, false, true])]
#[case::nz(ConditionSet::NZ, [true, true, false])]
#[case::zp(ConditionSet::ZP, [false, true, true])]
#[case::np(ConditionSet::NP, [true, false, true])]
#[case::always(ConditionSet::ALWAYS, [true, true, true])]
#[case::all(ConditionSet::ALL, [true, true, true])]
fn branch_grid_over_signs(#[case] condition: ConditionSet, #[case] expected: [bool; 3]) {
    for (value, taken) in [-10, 0, 10].into_iter().zip(expected) {
        assert_eq!(branch_taken(value, condition), taken, "{condition} on {value}");
    }
}

#[test]
fn lone_not_on_fresh_register_fails() {
    let program = Program::from(vec![Instruction::Not {
        dest: reg("r"),
        src: reg("r"),
    }]);

    let fault = Machine::new(&program).run().expect_err("uninitialized read");
    assert_eq!(fault.kind(), FaultKind::UninitializedRegister);
}

#[test]
fn self_branch_is_an_infinite_loop() {
    let program = Program::from(vec![
        Instruction::Label("x".into()),
        branch(ConditionSet::ALWAYS, "x"),
    ]);

    assert_eq!(
        Machine::new(&program).run(),
        Err(Fault::InfiniteLoop(oracle_core::DEFAULT_STEP_CEILING))
    );
}

#[test]
fn branch_to_undefined_label_is_missing() {
    let program = Program::from(vec![branch(ConditionSet::ALWAYS, "nowhere")]);

    assert_eq!(
        Machine::new(&program).run(),
        Err(Fault::MissingLabel("nowhere".into()))
    );
}

#[test]
fn zero_and_on_fresh_register_succeeds() {
    let program = Program::from(vec![Instruction::And {
        dest: reg("r1"),
        src: reg("r1"),
        operand: Operand::Immediate(0),
    }]);
    let mut machine = Machine::new(&program);

    machine.run().expect("zero masks the uninitialized read");
    assert_eq!(machine.register("r1"), Some(0));
    assert_eq!(machine.condition_flag(), Some(0));
}

#[test]
fn counted_loop_runs_to_completion() {
    // i = 5; while (i > 0) { acc = acc + 3; i = i - 1; }
    let mut instructions = load("i", 5).to_vec();
    instructions.extend(load("acc", 0));
    instructions.extend([
        Instruction::Label("top".into()),
        Instruction::Add {
            dest: reg("i"),
            src: reg("i"),
            operand: Operand::Immediate(0),
        },
        branch(ConditionSet::NZ, "done"),
        Instruction::Add {
            dest: reg("acc"),
            src: reg("acc"),
            operand: Operand::Immediate(3),
        },
        Instruction::Add {
            dest: reg("i"),
            src: reg("i"),
            operand: Operand::Immediate(-1),
        },
        branch(ConditionSet::ALWAYS, "top"),
        Instruction::Label("done".into()),
    ]);
    let program = Program::from(instructions);
    let config = MachineConfig {
        step_ceiling: 1_000,
        ..MachineConfig::default()
    };
    let mut machine = Machine::with_config(&program, config);

    machine.run().expect("loop terminates");
    assert_eq!(machine.register("acc"), Some(15));
    assert_eq!(machine.register("i"), Some(0));
}
