use thiserror::Error;

use crate::memory::ADDRESS_SPACE_BYTES;
use crate::CpuError;

/// Host-side program load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum LoadError {
    /// The image does not fit between `origin` and the end of the store.
    #[error("{len}-byte image at 0x{origin:04X} does not fit a {capacity}-byte store")]
    DoesNotFit {
        /// Requested load address.
        origin: u16,
        /// Image length in bytes.
        len: usize,
        /// Backing store size in bytes.
        capacity: usize,
    },
}

/// Bounds-checked handle to one byte of the backing store.
///
/// Only [`MemoryBus::cell`] creates cells, so holding one proves the address
/// was validated. The address itself is not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryCell {
    index: usize,
}

/// Flat byte-addressable storage owned by the core.
///
/// Every CPU-side access charges machine cycles to [`MemoryBus::elapsed`].
/// The loader surface (`load_program`, `peek`, `as_slice`) is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBus {
    bytes: Box<[u8]>,
    elapsed: u64,
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new(crate::memory::WORK_RAM_BYTES)
    }
}

impl MemoryBus {
    /// Allocates a zeroed store of `size` bytes, clamped to `1..=64 KiB`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.clamp(1, ADDRESS_SPACE_BYTES);
        Self {
            bytes: vec![0; size].into_boxed_slice(),
            elapsed: 0,
        }
    }

    /// Size of the backing store in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; a store holds at least one byte.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Machine cycles charged since construction or the last reset.
    #[must_use]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Clears the cycle counter without touching memory contents.
    pub const fn reset_elapsed(&mut self) {
        self.elapsed = 0;
    }

    /// Charges internal (non-bus) cycles.
    pub fn tick(&mut self, cycles: u8) {
        self.elapsed += u64::from(cycles);
    }

    fn index(&self, addr: u16) -> Result<usize, CpuError> {
        let index = usize::from(addr);
        if index < self.bytes.len() {
            Ok(index)
        } else {
            Err(CpuError::OutOfBounds { addr })
        }
    }

    /// Reads one byte. Costs one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when `addr` is outside the store.
    pub fn read(&mut self, addr: u16) -> Result<u8, CpuError> {
        let index = self.index(addr)?;
        self.elapsed += 1;
        Ok(self.bytes[index])
    }

    /// Reads a little-endian word: low byte at `addr`, high byte at `addr+1`.
    /// Costs two cycles.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when either byte is outside the
    /// store. Nothing is charged in that case.
    pub fn read_word(&mut self, addr: u16) -> Result<u16, CpuError> {
        let low = self.index(addr)?;
        let high = self.index(addr.wrapping_add(1))?;
        self.elapsed += 2;
        Ok(u16::from_le_bytes([self.bytes[low], self.bytes[high]]))
    }

    /// Writes one byte. Costs one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when `addr` is outside the store.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), CpuError> {
        let index = self.index(addr)?;
        self.elapsed += 1;
        self.bytes[index] = value;
        Ok(())
    }

    /// Writes a little-endian word. Both addresses are checked before either
    /// byte is stored. Costs two cycles.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when either byte is outside the
    /// store.
    pub fn write_word(&mut self, addr: u16, value: u16) -> Result<(), CpuError> {
        let low = self.index(addr)?;
        let high = self.index(addr.wrapping_add(1))?;
        let [low_byte, high_byte] = value.to_le_bytes();
        self.elapsed += 2;
        self.bytes[low] = low_byte;
        self.bytes[high] = high_byte;
        Ok(())
    }

    /// Validates `addr` and returns a cell for later free access. Costs one
    /// cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when `addr` is outside the store.
    pub fn cell(&mut self, addr: u16) -> Result<MemoryCell, CpuError> {
        let index = self.index(addr)?;
        self.elapsed += 1;
        Ok(MemoryCell { index })
    }

    /// Reads through a validated cell.
    #[must_use]
    pub fn load(&self, cell: MemoryCell) -> u8 {
        self.bytes[cell.index]
    }

    /// Writes through a validated cell.
    pub fn store(&mut self, cell: MemoryCell, value: u8) {
        self.bytes[cell.index] = value;
    }

    /// Copies `program` into the store at `origin`. Charges no cycles.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DoesNotFit`] when the image would run past the
    /// end of the store; memory is left untouched in that case.
    pub fn load_program(&mut self, origin: u16, program: &[u8]) -> Result<(), LoadError> {
        let start = usize::from(origin);
        let Some(window) = start
            .checked_add(program.len())
            .and_then(|end| self.bytes.get_mut(start..end))
        else {
            return Err(LoadError::DoesNotFit {
                origin,
                len: program.len(),
                capacity: self.bytes.len(),
            });
        };
        window.copy_from_slice(program);
        Ok(())
    }

    /// Reads one byte without charging cycles. `None` when out of bounds.
    #[must_use]
    pub fn peek(&self, addr: u16) -> Option<u8> {
        self.bytes.get(usize::from(addr)).copied()
    }

    /// Read-only view of the whole store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
