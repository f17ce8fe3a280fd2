//! Flat memory bus with bounds-checked access and machine-cycle accounting.

/// Backing store, access helpers, and the loader surface.
pub mod bus;

pub use bus::{LoadError, MemoryBus, MemoryCell};

/// Size in bytes of the full 16-bit address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Size in bytes of the default work-RAM backing store (8 KiB).
pub const WORK_RAM_BYTES: usize = 0x2000;
