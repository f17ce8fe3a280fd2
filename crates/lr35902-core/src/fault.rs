use thiserror::Error;

use crate::encoding::Opcode;

/// Terminal signals raised by the step loop.
///
/// `OutOfBounds` and `Unimplemented` are faults; `Halted` is a deliberate stop.
/// All three latch: once raised, every later step returns the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CpuError {
    /// A fetch, operand access, or stack access fell outside the backing store.
    #[error("memory access at 0x{addr:04X} is outside the backing store")]
    OutOfBounds {
        /// First address that failed the bounds check.
        addr: u16,
    },
    /// Decode reached an opcode with no execution semantics.
    #[error("opcode {opcode} has no execution semantics")]
    Unimplemented {
        /// Offending opcode.
        opcode: Opcode,
    },
    /// `HALT` or `STOP` was executed.
    #[error("execution halted by HALT or STOP")]
    Halted,
}

impl CpuError {
    /// Returns `true` for the fault kinds, `false` for an intentional halt.
    #[must_use]
    pub const fn is_fault(self) -> bool {
        !matches!(self, Self::Halted)
    }
}
