//! Sharp LR35902 CPU core: decode tables, ALU, and a cycle-counted step loop.

/// Flat memory bus with bounds checks and cycle accounting.
pub mod memory;
pub use memory::{LoadError, MemoryBus, MemoryCell, ADDRESS_SPACE_BYTES, WORK_RAM_BYTES};

/// Public host-facing API and integration types.
pub mod api;
pub use api::{CoreConfig, CoreState, RunOutcome, TraceEvent, TraceSink, CYCLES_PER_FRAME};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    compose_pair, split_pair, Flags, Operand8, OperandRef, Reg16, Reg8, Registers, RunState,
    StackPair, POWER_ON_SP,
};

/// Operation tags and opcode-field selectors.
pub mod encoding;
pub use encoding::{AluOp, Condition, Opcode, Operation, PairIndirect, ShiftOp, PREFIX_BYTE};

/// Compile-time opcode tables and lookup.
pub mod decoder;
pub use decoder::{Decoder, Instruction};

/// Mnemonic rendering and memory listings.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_window, DisassemblyRow};

/// Terminal step signals.
pub mod fault;
pub use fault::CpuError;

/// Internal cycle-cost table and lookup helpers.
pub mod timing;
pub use timing::{cost_kind, cycle_cost, CycleCostKind, CYCLE_COST_TABLE, TAKEN_BRANCH_CYCLES};

/// Instruction semantics and the step loop.
pub mod execute;
pub use execute::{execute_instruction, run_for_cycles, step_one, step_traced, ExecuteOutcome};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
