//! Public host-facing API for embedding the CPU core.

use crate::decoder::Instruction;
use crate::memory::{LoadError, MemoryBus, ADDRESS_SPACE_BYTES, WORK_RAM_BYTES};
use crate::state::{Registers, RunState, POWER_ON_SP};
use crate::CpuError;

/// Machine cycles in one video frame (about 59.7 Hz at 1,048,576 cycles/s).
///
/// Provided as a default budget for [`CoreState::run_for_cycles`]; the core
/// never enforces it.
pub const CYCLES_PER_FRAME: u64 = 17_556;

/// Construction-time configuration for a core instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Backing store size in bytes, starting at address `0x0000`.
    pub memory_bytes: usize,
    /// Stack pointer after power-on and reset.
    pub initial_sp: u16,
    /// Program counter after power-on and reset.
    pub initial_pc: u16,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            memory_bytes: WORK_RAM_BYTES,
            initial_sp: POWER_ON_SP,
            initial_pc: 0x0000,
        }
    }
}

impl CoreConfig {
    /// Returns `memory_bytes` clamped to `1..=64 KiB`.
    #[must_use]
    pub fn validated_memory_bytes(&self) -> usize {
        self.memory_bytes.clamp(1, ADDRESS_SPACE_BYTES)
    }

    fn power_on_registers(&self) -> Registers {
        let mut regs = Registers::default();
        regs.set_sp(self.initial_sp);
        regs.set_pc(self.initial_pc);
        regs
    }
}

/// CPU core: register file, memory bus, and run state.
///
/// The core exclusively owns its state. Hosts load memory through
/// [`CoreState::load_program`] or [`MemoryBus`] before stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreState {
    /// Architectural register file.
    pub regs: Registers,
    /// Backing memory and the running cycle counter.
    pub bus: MemoryBus,
    pub(crate) run_state: RunState,
    config: CoreConfig,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CoreState {
    /// Creates a powered-on core with zeroed memory.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            regs: config.power_on_registers(),
            bus: MemoryBus::new(config.validated_memory_bytes()),
            run_state: RunState::Running,
            config: config.clone(),
        }
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Configuration this core was built with.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Total machine cycles elapsed since power-on or reset.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.bus.elapsed()
    }

    /// Copies a program image into memory at `origin`. Charges no cycles.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DoesNotFit`] when the image runs past the end of
    /// the backing store.
    pub fn load_program(&mut self, origin: u16, program: &[u8]) -> Result<(), LoadError> {
        self.bus.load_program(origin, program)
    }

    /// Restores power-on registers, run state, and cycle counter. Memory is
    /// preserved.
    pub fn reset(&mut self) {
        self.regs = self.config.power_on_registers();
        self.run_state = RunState::Running;
        self.bus.reset_elapsed();
    }

    /// Executes one instruction. See [`crate::execute::step_one`].
    ///
    /// # Errors
    ///
    /// Returns the terminal signal raised by this step or latched earlier.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        crate::execute::step_one(self)
    }

    /// Executes one instruction, reporting trace events to `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`CoreState::step`].
    pub fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<u32, CpuError> {
        crate::execute::step_traced(self, sink)
    }

    /// Steps until `budget` cycles have elapsed or execution stops.
    pub fn run_for_cycles(&mut self, budget: u64) -> RunOutcome {
        crate::execute::run_for_cycles(self, budget)
    }
}

/// Aggregated outcome of a cycle-budgeted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions retired during the run.
    pub steps: u32,
    /// Cycles consumed, including any terminating step.
    pub cycles: u64,
    /// Terminal signal that ended the run early, if any.
    pub stop: Option<CpuError>,
}

/// Trace events emitted at step boundaries by [`CoreState::step_traced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Instruction fetched and decoded.
    InstructionStart {
        /// Address of the first opcode byte.
        pc: u16,
        /// Decoded instruction.
        instruction: Instruction,
    },
    /// Instruction retired.
    InstructionRetired {
        /// Address of the first opcode byte.
        pc: u16,
        /// Cycles consumed by the step.
        cycles: u32,
    },
    /// `HALT` or `STOP` retired.
    Halted {
        /// Address of the halting instruction.
        pc: u16,
    },
    /// A fault latched.
    FaultRaised {
        /// Address of the faulting instruction.
        pc: u16,
        /// Fault cause.
        cause: CpuError,
    },
}

/// Receiver for trace events.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
