#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_core::{ConditionSet, Instruction, Machine, MachineConfig, Operand, Program, Register};

const REGISTERS: [&str; 4] = ["a", "b", "c", "d"];
const LABELS: [&str; 3] = ["l0", "l1", "l2"];

fn decode(chunk: &[u8]) -> Instruction {
    let reg = |byte: u8| Register::new(REGISTERS[usize::from(byte) % REGISTERS.len()]);
    let label = |byte: u8| LABELS[usize::from(byte) % LABELS.len()].to_string();
    let operand = |byte: u8| {
        if byte & 0x80 == 0 {
            Operand::Immediate(i64::from(byte & 0x1F) - 15)
        } else {
            Operand::Register(reg(byte))
        }
    };

    match chunk[0] % 6 {
        0 => Instruction::Label(label(chunk[1])),
        1 => Instruction::Comment(String::new()),
        2 => Instruction::And {
            dest: reg(chunk[1]),
            src: reg(chunk[2]),
            operand: operand(chunk[3]),
        },
        3 => Instruction::Add {
            dest: reg(chunk[1]),
            src: reg(chunk[2]),
            operand: operand(chunk[3]),
        },
        4 => Instruction::Not {
            dest: reg(chunk[1]),
            src: reg(chunk[2]),
        },
        _ => Instruction::Branch {
            condition: ConditionSet::new(
                chunk[1] & 1 != 0,
                chunk[1] & 2 != 0,
                chunk[1] & 4 != 0,
            ),
            target: label(chunk[2]),
        },
    }
}

fuzz_target!(|data: &[u8]| {
    let program: Program = data.chunks_exact(4).map(decode).collect();
    let config = MachineConfig {
        step_ceiling: 4_096,
        ..MachineConfig::default()
    };

    let mut first = Machine::with_config(&program, config);
    let mut second = Machine::with_config(&program, config);
    let first_outcome = first.run();
    let second_outcome = second.run();

    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first.state(), second.state());
    assert!(first.steps() <= config.step_ceiling + 1);
});
