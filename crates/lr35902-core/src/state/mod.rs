//! Architectural CPU state: register file, operand capabilities, run state.

/// Operand selectors and resolved operand capabilities.
pub mod operand;
/// Register file types and storage model.
pub mod registers;
/// Deterministic run-state machine.
pub mod run_state;

pub use operand::{Operand8, OperandRef};
pub use registers::{
    compose_pair, split_pair, Flags, Reg16, Reg8, Registers, StackPair, FLAGS_ACTIVE_MASK,
    FLAG_C, FLAG_H, FLAG_N, FLAG_Z, POWER_ON_SP,
};
pub use run_state::RunState;
