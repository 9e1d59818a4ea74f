//! Operand resolution helpers for instruction execution.

use crate::{Fault, MachineState, Operand, Word};

/// Resolves an operand to its value: immediates directly, registers by reading them.
///
/// # Errors
///
/// Returns [`Fault::UninitializedRegister`] for a register that was never written.
pub fn resolve_operand(operand: &Operand, state: &MachineState) -> Result<Word, Fault> {
    match operand {
        Operand::Immediate(value) => Ok(*value),
        Operand::Register(register) => state.read(register),
    }
}

/// Bitwise AND where a zero on one side masks an uninitialized other side.
///
/// When both sides are unavailable, or the available side is non-zero, the
/// first side's fault is reported.
///
/// # Errors
///
/// Returns the read fault of an unavailable side that is not masked by zero.
pub fn and_with_zero_propagation(
    left: Result<Word, Fault>,
    right: Result<Word, Fault>,
) -> Result<Word, Fault> {
    match (left, right) {
        (Ok(left), Ok(right)) => Ok(left & right),
        (Err(_), Ok(0)) | (Ok(0), Err(_)) => Ok(0),
        (Err(fault), _) | (_, Err(fault)) => Err(fault),
    }
}
