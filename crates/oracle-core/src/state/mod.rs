//! Machine state model: register file and condition flag.

/// Sparse register file and condition flag storage.
pub mod registers;

pub use registers::MachineState;
