//! Deterministic final-state fingerprint used for cross-host comparison.

use oracle_core::{ConditionSet, Instruction, Machine, Operand, Program, Register};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn reg(name: &str) -> Register {
    Register::new(name)
}

fn program() -> Program {
    // Sums 1..=9 into `acc`, counting `i` down from 9.
    vec![
        Instruction::And {
            dest: reg("i"),
            src: reg("i"),
            operand: Operand::Immediate(0),
        },
        Instruction::Add {
            dest: reg("i"),
            src: reg("i"),
            operand: Operand::Immediate(9),
        },
        Instruction::And {
            dest: reg("acc"),
            src: reg("acc"),
            operand: Operand::Immediate(0),
        },
        Instruction::Label("top".into()),
        Instruction::Add {
            dest: reg("acc"),
            src: reg("acc"),
            operand: Operand::Register(reg("i")),
        },
        Instruction::Add {
            dest: reg("i"),
            src: reg("i"),
            operand: Operand::Immediate(-1),
        },
        Instruction::Branch {
            condition: ConditionSet::P,
            target: "top".into(),
        },
        Instruction::Not {
            dest: reg("inv"),
            src: reg("acc"),
        },
    ]
    .into()
}

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let program = program();
    let mut machine = Machine::new(&program);
    let outcome = machine.run().expect("fingerprint program terminates");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    hash_bytes(&mut hash, &outcome.steps.to_le_bytes());
    for (register, value) in machine.registers() {
        hash_bytes(&mut hash, register.name().as_bytes());
        hash_bytes(&mut hash, &value.to_le_bytes());
    }
    if let Some(flag) = machine.condition_flag() {
        hash_bytes(&mut hash, &flag.to_le_bytes());
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
