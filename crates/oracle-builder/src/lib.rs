//! Validating instruction builder for the condition-code oracle machine.
//!
//! A code generator under test emits instructions through [`Builder`]; the
//! resulting [`oracle_core::Program`] is then executed by
//! [`oracle_core::Machine`] and its final registers are asserted on.

/// Instruction emission with operand validation and a size cap.
pub mod builder;
pub use builder::{Builder, BuilderConfig, DEFAULT_IMMEDIATE_BOUND, DEFAULT_INSTRUCTION_CAP};

/// Fresh temporary and label name generation.
pub mod names;
pub use names::{LabelPair, LabelScope, NameGenerator, TEMPORARY_PREFIX};

#[cfg(test)]
use proptest as _;
