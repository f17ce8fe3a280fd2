use std::fmt;

use crate::memory::{MemoryBus, MemoryCell};
use crate::state::{Reg8, Registers};
use crate::CpuError;

/// 8-bit operand selector from the 3-bit register fields of the opcode map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand8 {
    /// Register operand.
    Reg(Reg8),
    /// Memory cell addressed by `HL`.
    IndirectHl,
}

impl Operand8 {
    /// All eight selectors in encoding order.
    pub const ALL: [Self; 8] = [
        Self::from_selector(0),
        Self::from_selector(1),
        Self::from_selector(2),
        Self::from_selector(3),
        Self::from_selector(4),
        Self::from_selector(5),
        Self::from_selector(6),
        Self::from_selector(7),
    ];

    /// Decodes a 3-bit selector: `0..=5` are `B C D E H L`, `6` is `(HL)`,
    /// `7` is `A`.
    #[must_use]
    pub const fn from_selector(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Reg(Reg8::B),
            1 => Self::Reg(Reg8::C),
            2 => Self::Reg(Reg8::D),
            3 => Self::Reg(Reg8::E),
            4 => Self::Reg(Reg8::H),
            5 => Self::Reg(Reg8::L),
            6 => Self::IndirectHl,
            _ => Self::Reg(Reg8::A),
        }
    }

    /// Returns `true` for the `(HL)` selector.
    #[must_use]
    pub const fn is_indirect(self) -> bool {
        matches!(self, Self::IndirectHl)
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(reg) => f.write_str(reg.name()),
            Self::IndirectHl => f.write_str("(HL)"),
        }
    }
}

/// Resolved operand: a capability to get or set one byte.
///
/// Memory operands carry a bounds-checked [`MemoryCell`], so reads and
/// writes through a resolved reference cannot fail and cost no further
/// cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandRef {
    /// Register slot.
    Register(Reg8),
    /// Memory cell validated at resolution time.
    Memory(MemoryCell),
}

impl OperandRef {
    /// Resolves a selector against the current register file.
    ///
    /// Resolving `(HL)` bounds-checks `HL` and charges one machine cycle on
    /// the bus.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::OutOfBounds`] when `HL` is outside the backing store.
    pub fn resolve(
        operand: Operand8,
        regs: &Registers,
        bus: &mut MemoryBus,
    ) -> Result<Self, CpuError> {
        match operand {
            Operand8::Reg(reg) => Ok(Self::Register(reg)),
            Operand8::IndirectHl => bus.cell(regs.hl()).map(Self::Memory),
        }
    }

    /// Reads the referenced byte.
    #[must_use]
    pub fn get(self, regs: &Registers, bus: &MemoryBus) -> u8 {
        match self {
            Self::Register(reg) => regs.reg(reg),
            Self::Memory(cell) => bus.load(cell),
        }
    }

    /// Writes the referenced byte.
    pub fn set(self, regs: &mut Registers, bus: &mut MemoryBus, value: u8) {
        match self {
            Self::Register(reg) => regs.set_reg(reg, value),
            Self::Memory(cell) => bus.store(cell, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Operand8, OperandRef};
    use crate::memory::MemoryBus;
    use crate::state::{Reg16, Reg8, Registers};
    use crate::CpuError;

    #[test]
    fn selectors_follow_hardware_register_order() {
        let expected = [
            Operand8::Reg(Reg8::B),
            Operand8::Reg(Reg8::C),
            Operand8::Reg(Reg8::D),
            Operand8::Reg(Reg8::E),
            Operand8::Reg(Reg8::H),
            Operand8::Reg(Reg8::L),
            Operand8::IndirectHl,
            Operand8::Reg(Reg8::A),
        ];
        assert_eq!(Operand8::ALL, expected);
        assert!(Operand8::from_selector(6).is_indirect());
        assert_eq!(Operand8::from_selector(6).to_string(), "(HL)");
    }

    #[test]
    fn register_resolution_is_free() {
        let regs = Registers::default();
        let mut bus = MemoryBus::new(0x100);
        let resolved = OperandRef::resolve(Operand8::Reg(Reg8::D), &regs, &mut bus)
            .expect("register operands always resolve");
        assert_eq!(resolved, OperandRef::Register(Reg8::D));
        assert_eq!(bus.elapsed(), 0);
    }

    #[test]
    fn indirect_resolution_charges_one_cycle_and_aliases_memory() {
        let mut regs = Registers::default();
        regs.set_pair(Reg16::HL, 0x0042);
        let mut bus = MemoryBus::new(0x100);

        let cell = OperandRef::resolve(Operand8::IndirectHl, &regs, &mut bus)
            .expect("HL inside the store");
        assert_eq!(bus.elapsed(), 1);

        cell.set(&mut regs, &mut bus, 0x99);
        assert_eq!(bus.peek(0x0042), Some(0x99));
        assert_eq!(cell.get(&regs, &bus), 0x99);
        assert_eq!(bus.elapsed(), 1);
    }

    #[test]
    fn indirect_resolution_outside_store_faults() {
        let mut regs = Registers::default();
        regs.set_pair(Reg16::HL, 0x0100);
        let mut bus = MemoryBus::new(0x100);

        assert_eq!(
            OperandRef::resolve(Operand8::IndirectHl, &regs, &mut bus),
            Err(CpuError::OutOfBounds { addr: 0x0100 })
        );
        assert_eq!(bus.elapsed(), 0);
    }
}
