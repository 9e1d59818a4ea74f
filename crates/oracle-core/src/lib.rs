//! Condition-code register machine used as an executable oracle for
//! compiler back ends.

/// Fault taxonomy shared by program construction and execution.
pub mod fault;
pub use fault::{Fault, FaultClass, FaultKind};

/// Registers, operands, and loosely-typed input normalization.
pub mod operand;
pub use operand::{Operand, RawValue, Register, Word, LITERAL_MARKER};

/// Branch condition sets.
pub mod condition;
pub use condition::ConditionSet;

/// Instruction set, program container, and listings.
pub mod instruction;
pub use instruction::{Instruction, ListingRow, Program};

/// Register file and condition flag model.
pub mod state;
pub use state::MachineState;

/// Label resolution for branch targets.
pub mod labels;
pub use labels::LabelTable;

/// Host-facing configuration, outcomes, and trace hooks.
pub mod api;
pub use api::{
    MachineConfig, NoTrace, RunOutcome, StepOutcome, TraceEvent, TraceSink, DEFAULT_STEP_CEILING,
};

/// Per-instruction execution and commit.
pub mod execute;
pub use execute::{commit_execution, execute_instruction, ExecuteState};

/// Fetch-execute loop.
pub mod machine;
pub use machine::Machine;

#[cfg(test)]
use proptest as _;
