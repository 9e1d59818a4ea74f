//! Host-facing configuration, outcomes, and trace hooks.

use crate::{FaultKind, Register, Word};

/// Default maximum number of executed instructions per run.
pub const DEFAULT_STEP_CEILING: u64 = 100_000;

/// Configuration for one machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Executed-instruction count beyond which a run is treated as non-terminating.
    pub step_ceiling: u64,
    /// Enables trace callback dispatch.
    pub tracing_enabled: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            step_ceiling: DEFAULT_STEP_CEILING,
            tracing_enabled: false,
        }
    }
}

/// Result of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// An instruction executed.
    Retired {
        /// Index of the executed instruction.
        pc: usize,
        /// Index of the next instruction.
        next_pc: usize,
    },
    /// The program counter is past the last instruction.
    Finished,
}

/// Summary of a run that terminated normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Total executed instructions.
    pub steps: u64,
}

/// Trace events emitted in execution order when tracing is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// About to execute the instruction at `pc`.
    InstructionStart {
        /// Instruction index.
        pc: usize,
    },
    /// A register write was committed.
    RegisterWritten {
        /// Index of the writing instruction.
        pc: usize,
        /// Written register.
        register: Register,
        /// Written value, also the new condition flag.
        value: Word,
    },
    /// A branch overrode the program counter.
    BranchTaken {
        /// Index of the branch instruction.
        pc: usize,
        /// Resolved target index.
        target: usize,
    },
    /// Execution failed.
    FaultRaised {
        /// Index of the instruction being executed.
        pc: usize,
        /// Kind of the raised fault.
        kind: FaultKind,
    },
    /// The program counter ran past the last instruction.
    Finished {
        /// Total executed instructions.
        steps: u64,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}
