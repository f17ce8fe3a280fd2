//! Operation tags and operand selectors for the LR35902 opcode map.
//!
//! Every field here is extracted from fixed bit positions of an opcode byte.
//! The 3-bit `y` field (bits 5..3) selects ALU/shift operations, conditions,
//! bit indices, and destination registers; the 2-bit `p` field (bits 5..4)
//! selects register pairs.

use std::fmt;

use crate::state::{Operand8, Reg16, StackPair};

/// Lead byte that selects the secondary (bit/rotate) opcode table.
pub const PREFIX_BYTE: u8 = 0xCB;

/// Identity of an opcode in either the base or the prefixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Single-byte opcode from the base table.
    Base(u8),
    /// Second byte of a `0xCB`-prefixed opcode.
    Prefixed(u8),
}

impl Opcode {
    /// Returns the table index byte of this opcode.
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Self::Base(byte) | Self::Prefixed(byte) => byte,
        }
    }

    /// Returns `true` for opcodes from the `0xCB` table.
    #[must_use]
    pub const fn is_prefixed(self) -> bool {
        matches!(self, Self::Prefixed(_))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(byte) => write!(f, "0x{byte:02X}"),
            Self::Prefixed(byte) => write!(f, "0x{PREFIX_BYTE:02X} 0x{byte:02X}"),
        }
    }
}

/// Accumulator arithmetic/logic operation selected by bits 5..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    /// Decodes a 3-bit ALU selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Add,
            1 => Self::Adc,
            2 => Self::Sub,
            3 => Self::Sbc,
            4 => Self::And,
            5 => Self::Xor,
            6 => Self::Or,
            _ => Self::Cp,
        }
    }
}

/// Rotate/shift operation of the prefixed table (and the four accumulator
/// rotates of the base table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    /// Decodes a 3-bit shift selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Rlc,
            1 => Self::Rrc,
            2 => Self::Rl,
            3 => Self::Rr,
            4 => Self::Sla,
            5 => Self::Sra,
            6 => Self::Swap,
            _ => Self::Srl,
        }
    }
}

/// Branch condition selected by bits 4..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `NZ`: zero flag clear.
    NotZero,
    /// `Z`: zero flag set.
    Zero,
    /// `NC`: carry flag clear.
    NotCarry,
    /// `C`: carry flag set.
    Carry,
}

impl Condition {
    /// Decodes a 2-bit condition selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::NotZero,
            1 => Self::Zero,
            2 => Self::NotCarry,
            _ => Self::Carry,
        }
    }
}

/// Address source for `LD (rr),A` and `LD A,(rr)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairIndirect {
    /// Address in `BC`.
    Bc,
    /// Address in `DE`.
    De,
    /// Address in `HL`, incremented after the access.
    HlIncrement,
    /// Address in `HL`, decremented after the access.
    HlDecrement,
}

impl PairIndirect {
    /// Decodes a 2-bit pair selector.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Bc,
            1 => Self::De,
            2 => Self::HlIncrement,
            _ => Self::HlDecrement,
        }
    }
}

/// Decoded operation with its operand selectors.
///
/// Immediate operands are not part of the operation; the executor fetches
/// them from the instruction stream, see [`Operation::immediate_len`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `NOP`.
    Nop,
    /// `STOP` (two bytes; the second is padding).
    Stop,
    /// `HALT`.
    Halt,
    /// Lead byte of the prefixed table. The step loop consumes it.
    Prefix,
    /// `LD rr,d16`.
    LoadImm16 {
        /// Destination pair.
        dst: Reg16,
    },
    /// `LD r,d8` and `LD (HL),d8`.
    LoadImm8 {
        /// Destination operand.
        dst: Operand8,
    },
    /// `LD r,r'`, `LD r,(HL)`, `LD (HL),r`.
    Load {
        /// Destination operand.
        dst: Operand8,
        /// Source operand.
        src: Operand8,
    },
    /// `LD (rr),A`, including `LD (HL+),A` and `LD (HL-),A`.
    StoreIndirect {
        /// Address source.
        pair: PairIndirect,
    },
    /// `LD A,(rr)`, including `LD A,(HL+)` and `LD A,(HL-)`.
    LoadIndirect {
        /// Address source.
        pair: PairIndirect,
    },
    /// `INC rr`.
    IncPair {
        /// Target pair.
        pair: Reg16,
    },
    /// `DEC rr`.
    DecPair {
        /// Target pair.
        pair: Reg16,
    },
    /// `INC r` and `INC (HL)`.
    IncByte {
        /// Target operand.
        target: Operand8,
    },
    /// `DEC r` and `DEC (HL)`.
    DecByte {
        /// Target operand.
        target: Operand8,
    },
    /// Accumulator ALU operation with a register or `(HL)` source.
    Alu {
        /// ALU operation.
        op: AluOp,
        /// Source operand.
        src: Operand8,
    },
    /// Accumulator ALU operation with an immediate source.
    AluImm {
        /// ALU operation.
        op: AluOp,
    },
    /// `ADD HL,rr`.
    AddHl {
        /// Source pair.
        src: Reg16,
    },
    /// `RLCA`, `RRCA`, `RLA`, `RRA`.
    RotateA {
        /// Rotate kind (one of the four rotate variants).
        op: ShiftOp,
    },
    /// `DAA`.
    Daa,
    /// `CPL`.
    Cpl,
    /// `SCF`.
    Scf,
    /// `CCF`.
    Ccf,
    /// `JR e8` and `JR cc,e8`.
    JumpRelative {
        /// Branch condition, `None` when unconditional.
        cond: Option<Condition>,
    },
    /// `JP a16` and `JP cc,a16`.
    Jump {
        /// Branch condition, `None` when unconditional.
        cond: Option<Condition>,
    },
    /// `JP HL`.
    JumpHl,
    /// `CALL a16` and `CALL cc,a16`.
    Call {
        /// Branch condition, `None` when unconditional.
        cond: Option<Condition>,
    },
    /// `RET` and `RET cc`.
    Return {
        /// Branch condition, `None` when unconditional.
        cond: Option<Condition>,
    },
    /// `RETI`.
    ReturnInterrupt,
    /// `RST n`.
    Restart {
        /// Call target (`0x00..=0x38`, step 8).
        vector: u8,
    },
    /// `PUSH rr`.
    Push {
        /// Source pair.
        pair: StackPair,
    },
    /// `POP rr`.
    Pop {
        /// Destination pair.
        pair: StackPair,
    },
    /// `LDH (a8),A`.
    StoreHigh,
    /// `LDH A,(a8)`.
    LoadHigh,
    /// `LD (C),A`.
    StoreHighC,
    /// `LD A,(C)`.
    LoadHighC,
    /// `LD (a16),A`.
    StoreAbsolute,
    /// `LD A,(a16)`.
    LoadAbsolute,
    /// `LD (a16),SP`.
    StoreSp,
    /// `LD SP,HL`.
    LoadSpHl,
    /// `LD HL,SP+e8`.
    LoadHlSpOffset,
    /// `ADD SP,e8`.
    AddSpOffset,
    /// `DI`.
    DisableInterrupts,
    /// `EI`.
    EnableInterrupts,
    /// Prefixed rotate/shift/swap.
    Shift {
        /// Shift kind.
        op: ShiftOp,
        /// Target operand.
        target: Operand8,
    },
    /// Prefixed `BIT b,r`.
    Bit {
        /// Tested bit index (`0..=7`).
        bit: u8,
        /// Tested operand.
        target: Operand8,
    },
    /// Prefixed `RES b,r`.
    Res {
        /// Cleared bit index (`0..=7`).
        bit: u8,
        /// Target operand.
        target: Operand8,
    },
    /// Prefixed `SET b,r`.
    Set {
        /// Set bit index (`0..=7`).
        bit: u8,
        /// Target operand.
        target: Operand8,
    },
    /// Opcode with no execution semantics.
    Unimplemented {
        /// Offending opcode.
        opcode: Opcode,
    },
}

impl Operation {
    /// Number of immediate bytes following the opcode (or the prefixed pair).
    #[must_use]
    pub const fn immediate_len(self) -> u8 {
        match self {
            Self::LoadImm8 { .. }
            | Self::AluImm { .. }
            | Self::JumpRelative { .. }
            | Self::StoreHigh
            | Self::LoadHigh
            | Self::LoadHlSpOffset
            | Self::AddSpOffset
            | Self::Stop => 1,
            Self::LoadImm16 { .. }
            | Self::Jump { .. }
            | Self::Call { .. }
            | Self::StoreAbsolute
            | Self::LoadAbsolute
            | Self::StoreSp => 2,
            _ => 0,
        }
    }

    /// Returns `true` when the operation has no execution semantics.
    #[must_use]
    pub const fn is_unimplemented(self) -> bool {
        matches!(self, Self::Unimplemented { .. })
    }
}
