//! Instruction decoder for the LR35902 opcode map.
//!
//! Both opcode spaces are dense 256-entry tables built at compile time from
//! the structural layout of the map: bits 7..6 pick the row block (`x`),
//! bits 5..3 (`y`) and 2..0 (`z`) select operands, and `y` splits further
//! into a pair selector `p` (bits 5..4) and a column flag `q` (bit 3).

use crate::encoding::{AluOp, Condition, Opcode, Operation, PairIndirect, ShiftOp};
use crate::state::{Operand8, Reg16, StackPair};
use crate::timing::{cost_kind, cycle_cost};

/// Decoded instruction: the operation plus its internal cycle cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Opcode this entry was decoded from.
    pub opcode: Opcode,
    /// Operation tag with operand selectors.
    pub operation: Operation,
    /// Internal cycles charged on top of bus traffic.
    pub cycles: u8,
}

impl Instruction {
    /// Builds a table entry, pricing it from the cycle cost table.
    #[must_use]
    pub const fn new(opcode: Opcode, operation: Operation) -> Self {
        let cycles = match cycle_cost(cost_kind(&operation)) {
            Some(cycles) => cycles,
            None => 0,
        };
        Self {
            opcode,
            operation,
            cycles,
        }
    }

    /// Encoded length in bytes, including prefix and immediates.
    #[must_use]
    pub const fn encoded_len(&self) -> u8 {
        let opcode_bytes = if self.opcode.is_prefixed() { 2 } else { 1 };
        opcode_bytes + self.operation.immediate_len()
    }
}

const fn fields(opcode: u8) -> (u8, u8, u8, u8, u8) {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    (x, y, z, y >> 1, y & 0x01)
}

const fn decode_base_slot(opcode: u8) -> Operation {
    let (x, y, z, p, q) = fields(opcode);
    match (x, z) {
        (0, 0) => match y {
            0 => Operation::Nop,
            1 => Operation::StoreSp,
            2 => Operation::Stop,
            3 => Operation::JumpRelative { cond: None },
            _ => Operation::JumpRelative {
                cond: Some(Condition::from_bits(y)),
            },
        },
        (0, 1) if q == 0 => Operation::LoadImm16 {
            dst: Reg16::from_bits(p),
        },
        (0, 1) => Operation::AddHl {
            src: Reg16::from_bits(p),
        },
        (0, 2) if q == 0 => Operation::StoreIndirect {
            pair: PairIndirect::from_bits(p),
        },
        (0, 2) => Operation::LoadIndirect {
            pair: PairIndirect::from_bits(p),
        },
        (0, 3) if q == 0 => Operation::IncPair {
            pair: Reg16::from_bits(p),
        },
        (0, 3) => Operation::DecPair {
            pair: Reg16::from_bits(p),
        },
        (0, 4) => Operation::IncByte {
            target: Operand8::from_selector(y),
        },
        (0, 5) => Operation::DecByte {
            target: Operand8::from_selector(y),
        },
        (0, 6) => Operation::LoadImm8 {
            dst: Operand8::from_selector(y),
        },
        (0, _) => match y {
            0..=3 => Operation::RotateA {
                op: ShiftOp::from_bits(y),
            },
            4 => Operation::Daa,
            5 => Operation::Cpl,
            6 => Operation::Scf,
            _ => Operation::Ccf,
        },
        (1, 6) if y == 6 => Operation::Halt,
        (1, _) => Operation::Load {
            dst: Operand8::from_selector(y),
            src: Operand8::from_selector(z),
        },
        (2, _) => Operation::Alu {
            op: AluOp::from_bits(y),
            src: Operand8::from_selector(z),
        },
        (_, 0) => match y {
            0..=3 => Operation::Return {
                cond: Some(Condition::from_bits(y)),
            },
            4 => Operation::StoreHigh,
            5 => Operation::AddSpOffset,
            6 => Operation::LoadHigh,
            _ => Operation::LoadHlSpOffset,
        },
        (_, 1) if q == 0 => Operation::Pop {
            pair: StackPair::from_bits(p),
        },
        (_, 1) => match p {
            0 => Operation::Return { cond: None },
            1 => Operation::ReturnInterrupt,
            2 => Operation::JumpHl,
            _ => Operation::LoadSpHl,
        },
        (_, 2) => match y {
            0..=3 => Operation::Jump {
                cond: Some(Condition::from_bits(y)),
            },
            4 => Operation::StoreHighC,
            5 => Operation::StoreAbsolute,
            6 => Operation::LoadHighC,
            _ => Operation::LoadAbsolute,
        },
        (_, 3) => match y {
            0 => Operation::Jump { cond: None },
            1 => Operation::Prefix,
            6 => Operation::DisableInterrupts,
            7 => Operation::EnableInterrupts,
            _ => Operation::Unimplemented {
                opcode: Opcode::Base(opcode),
            },
        },
        (_, 4) if y < 4 => Operation::Call {
            cond: Some(Condition::from_bits(y)),
        },
        (_, 5) if q == 0 => Operation::Push {
            pair: StackPair::from_bits(p),
        },
        (_, 5) if p == 0 => Operation::Call { cond: None },
        (_, 4 | 5) => Operation::Unimplemented {
            opcode: Opcode::Base(opcode),
        },
        (_, 6) => Operation::AluImm {
            op: AluOp::from_bits(y),
        },
        (_, _) => Operation::Restart { vector: y * 8 },
    }
}

const fn decode_prefixed_slot(opcode: u8) -> Operation {
    let (x, y, z, _, _) = fields(opcode);
    let target = Operand8::from_selector(z);
    match x {
        0 => Operation::Shift {
            op: ShiftOp::from_bits(y),
            target,
        },
        1 => Operation::Bit { bit: y, target },
        2 => Operation::Res { bit: y, target },
        _ => Operation::Set { bit: y, target },
    }
}

const fn build_table(prefixed: bool) -> [Instruction; 256] {
    let mut table = [Instruction::new(Opcode::Base(0), Operation::Nop); 256];
    let mut opcode: u8 = 0;
    loop {
        table[opcode as usize] = if prefixed {
            Instruction::new(Opcode::Prefixed(opcode), decode_prefixed_slot(opcode))
        } else {
            Instruction::new(Opcode::Base(opcode), decode_base_slot(opcode))
        };
        if opcode == u8::MAX {
            break;
        }
        opcode += 1;
    }
    table
}

static BASE_TABLE: [Instruction; 256] = build_table(false);
static PREFIXED_TABLE: [Instruction; 256] = build_table(true);

/// Table-driven decoder for both opcode spaces.
pub struct Decoder;

impl Decoder {
    /// Looks up an opcode byte in the base table.
    #[must_use]
    pub fn decode(opcode: u8) -> Instruction {
        BASE_TABLE[usize::from(opcode)]
    }

    /// Looks up the byte after `0xCB` in the prefixed table.
    #[must_use]
    pub fn decode_prefixed(opcode: u8) -> Instruction {
        PREFIXED_TABLE[usize::from(opcode)]
    }
}
