//! Condition-code machine: fetch-execute loop with a step ceiling.

use std::collections::BTreeMap;

use crate::execute::{commit_execution, execute_instruction};
use crate::{
    Fault, LabelTable, MachineConfig, MachineState, NoTrace, Program, Register, RunOutcome,
    StepOutcome, TraceEvent, TraceSink, Word,
};

/// Interpreter over one program, holding the state of a single run.
///
/// Build a fresh machine to replay a program from a clean state; state is
/// never reset implicitly.
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p Program,
    labels: LabelTable,
    state: MachineState,
    config: MachineConfig,
}

impl<'p> Machine<'p> {
    /// Creates a machine over `program` with the default configuration.
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Creates a machine over `program` and resolves its label table.
    #[must_use]
    pub fn with_config(program: &'p Program, config: MachineConfig) -> Self {
        Self {
            program,
            labels: LabelTable::from_program(program),
            state: MachineState::default(),
            config,
        }
    }

    /// Runs until the program counter passes the last instruction.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised by an instruction, or
    /// [`Fault::InfiniteLoop`] once the step ceiling is exceeded.
    pub fn run(&mut self) -> Result<RunOutcome, Fault> {
        self.run_traced(&mut NoTrace)
    }

    /// Runs like [`Machine::run`], reporting trace events to `sink` when
    /// tracing is enabled in the configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::run`].
    pub fn run_traced(&mut self, sink: &mut dyn TraceSink) -> Result<RunOutcome, Fault> {
        loop {
            if let StepOutcome::Finished = self.step_traced(sink)? {
                return Ok(RunOutcome {
                    steps: self.state.steps(),
                });
            }
        }
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::run`], for this single instruction.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        self.step_traced(&mut NoTrace)
    }

    fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<StepOutcome, Fault> {
        let pc = self.state.pc();
        let program = self.program;
        let Some(instr) = program.get(pc) else {
            self.trace(sink, TraceEvent::Finished {
                steps: self.state.steps(),
            });
            return Ok(StepOutcome::Finished);
        };

        self.trace(sink, TraceEvent::InstructionStart { pc });

        let exec = match execute_instruction(instr, &self.state, &self.labels) {
            Ok(exec) => exec,
            Err(fault) => return Err(self.raise(sink, pc, fault)),
        };

        if let Some((register, value)) = &exec.dest {
            self.trace(sink, TraceEvent::RegisterWritten {
                pc,
                register: register.clone(),
                value: *value,
            });
        }
        if let Some(target) = exec.next_pc {
            self.trace(sink, TraceEvent::BranchTaken { pc, target });
        }

        let next_pc = commit_execution(&mut self.state, exec);

        if self.state.count_step() > self.config.step_ceiling {
            return Err(self.raise(sink, pc, Fault::InfiniteLoop(self.config.step_ceiling)));
        }

        Ok(StepOutcome::Retired { pc, next_pc })
    }

    fn raise(&self, sink: &mut dyn TraceSink, pc: usize, fault: Fault) -> Fault {
        self.trace(sink, TraceEvent::FaultRaised {
            pc,
            kind: fault.kind(),
        });
        fault
    }

    fn trace(&self, sink: &mut dyn TraceSink, event: TraceEvent) {
        if self.config.tracing_enabled {
            sink.on_event(event);
        }
    }

    /// Current machine state.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Written registers, ordered by name.
    #[must_use]
    pub const fn registers(&self) -> &BTreeMap<Register, Word> {
        self.state.registers()
    }

    /// Value of `register`, or `None` when never written.
    #[must_use]
    pub fn register(&self, register: &str) -> Option<Word> {
        self.state.register(register)
    }

    /// Value last written to any register.
    #[must_use]
    pub const fn condition_flag(&self) -> Option<Word> {
        self.state.condition_flag()
    }

    /// Index of the next instruction to execute.
    #[must_use]
    pub const fn pc(&self) -> usize {
        self.state.pc()
    }

    /// Number of instructions executed so far.
    ///
    /// Never exceeds the step ceiling on a terminating run. After
    /// `InfiniteLoop` it reads `ceiling + 1`, counting the step that tripped it.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.state.steps()
    }

    /// Label table resolved at construction.
    #[must_use]
    pub const fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Program being executed.
    #[must_use]
    pub const fn program(&self) -> &'p Program {
        self.program
    }

    /// Configuration of this machine.
    #[must_use]
    pub const fn config(&self) -> MachineConfig {
        self.config
    }
}
