//! Instruction disassembly for the LR35902 opcode map.
//!
//! [`Operation`] and [`Instruction`] render with operand placeholders
//! (`d8`, `d16`, `a8`, `a16`, `e8`). [`disassemble_one`] reads the actual
//! immediates from memory and substitutes them.

use std::fmt;

use crate::decoder::{Decoder, Instruction};
use crate::encoding::{AluOp, Condition, Operation, PairIndirect, ShiftOp, PREFIX_BYTE};

const fn alu_mnemonic(op: AluOp) -> &'static str {
    match op {
        AluOp::Add => "ADD A,",
        AluOp::Adc => "ADC A,",
        AluOp::Sub => "SUB ",
        AluOp::Sbc => "SBC A,",
        AluOp::And => "AND ",
        AluOp::Xor => "XOR ",
        AluOp::Or => "OR ",
        AluOp::Cp => "CP ",
    }
}

const fn shift_mnemonic(op: ShiftOp) -> &'static str {
    match op {
        ShiftOp::Rlc => "RLC",
        ShiftOp::Rrc => "RRC",
        ShiftOp::Rl => "RL",
        ShiftOp::Rr => "RR",
        ShiftOp::Sla => "SLA",
        ShiftOp::Sra => "SRA",
        ShiftOp::Swap => "SWAP",
        ShiftOp::Srl => "SRL",
    }
}

const fn condition_name(cond: Condition) -> &'static str {
    match cond {
        Condition::NotZero => "NZ",
        Condition::Zero => "Z",
        Condition::NotCarry => "NC",
        Condition::Carry => "C",
    }
}

const fn indirect_name(pair: PairIndirect) -> &'static str {
    match pair {
        PairIndirect::Bc => "(BC)",
        PairIndirect::De => "(DE)",
        PairIndirect::HlIncrement => "(HL+)",
        PairIndirect::HlDecrement => "(HL-)",
    }
}

fn branch(
    f: &mut fmt::Formatter<'_>,
    mnemonic: &str,
    cond: Option<Condition>,
    target: &str,
) -> fmt::Result {
    match cond {
        Some(cond) if target.is_empty() => write!(f, "{mnemonic} {}", condition_name(cond)),
        Some(cond) => write!(f, "{mnemonic} {},{target}", condition_name(cond)),
        None if target.is_empty() => f.write_str(mnemonic),
        None => write!(f, "{mnemonic} {target}"),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Nop => f.write_str("NOP"),
            Self::Stop => f.write_str("STOP"),
            Self::Halt => f.write_str("HALT"),
            Self::Prefix => f.write_str("PREFIX CB"),
            Self::LoadImm16 { dst } => write!(f, "LD {},d16", dst.name()),
            Self::LoadImm8 { dst } => write!(f, "LD {dst},d8"),
            Self::Load { dst, src } => write!(f, "LD {dst},{src}"),
            Self::StoreIndirect { pair } => write!(f, "LD {},A", indirect_name(pair)),
            Self::LoadIndirect { pair } => write!(f, "LD A,{}", indirect_name(pair)),
            Self::IncPair { pair } => write!(f, "INC {}", pair.name()),
            Self::DecPair { pair } => write!(f, "DEC {}", pair.name()),
            Self::IncByte { target } => write!(f, "INC {target}"),
            Self::DecByte { target } => write!(f, "DEC {target}"),
            Self::Alu { op, src } => write!(f, "{}{src}", alu_mnemonic(op)),
            Self::AluImm { op } => write!(f, "{}d8", alu_mnemonic(op)),
            Self::AddHl { src } => write!(f, "ADD HL,{}", src.name()),
            Self::RotateA { op } => write!(f, "{}A", shift_mnemonic(op)),
            Self::Daa => f.write_str("DAA"),
            Self::Cpl => f.write_str("CPL"),
            Self::Scf => f.write_str("SCF"),
            Self::Ccf => f.write_str("CCF"),
            Self::JumpRelative { cond } => branch(f, "JR", cond, "e8"),
            Self::Jump { cond } => branch(f, "JP", cond, "a16"),
            Self::JumpHl => f.write_str("JP HL"),
            Self::Call { cond } => branch(f, "CALL", cond, "a16"),
            Self::Return { cond } => branch(f, "RET", cond, ""),
            Self::ReturnInterrupt => f.write_str("RETI"),
            Self::Restart { vector } => write!(f, "RST {vector:02X}H"),
            Self::Push { pair } => write!(f, "PUSH {}", pair.name()),
            Self::Pop { pair } => write!(f, "POP {}", pair.name()),
            Self::StoreHigh => f.write_str("LDH (a8),A"),
            Self::LoadHigh => f.write_str("LDH A,(a8)"),
            Self::StoreHighC => f.write_str("LD (C),A"),
            Self::LoadHighC => f.write_str("LD A,(C)"),
            Self::StoreAbsolute => f.write_str("LD (a16),A"),
            Self::LoadAbsolute => f.write_str("LD A,(a16)"),
            Self::StoreSp => f.write_str("LD (a16),SP"),
            Self::LoadSpHl => f.write_str("LD SP,HL"),
            Self::LoadHlSpOffset => f.write_str("LD HL,SP+e8"),
            Self::AddSpOffset => f.write_str("ADD SP,e8"),
            Self::DisableInterrupts => f.write_str("DI"),
            Self::EnableInterrupts => f.write_str("EI"),
            Self::Shift { op, target } => write!(f, "{} {target}", shift_mnemonic(op)),
            Self::Bit { bit, target } => write!(f, "BIT {bit},{target}"),
            Self::Res { bit, target } => write!(f, "RES {bit},{target}"),
            Self::Set { bit, target } => write!(f, "SET {bit},{target}"),
            Self::Unimplemented { opcode } => write!(f, "ILLEGAL {opcode}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.operation, f)
    }
}

/// A single disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRow {
    /// Address of the first opcode byte.
    pub addr_start: u16,
    /// Encoded bytes, including prefix and immediates.
    pub bytes: Vec<u8>,
    /// Decoded instruction.
    pub instruction: Instruction,
    /// Mnemonic with immediates substituted (e.g. `LD A,$12`).
    pub text: String,
}

impl DisassemblyRow {
    /// Encoded length in bytes.
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the opcode has no execution semantics.
    #[must_use]
    pub const fn is_illegal(&self) -> bool {
        self.instruction.operation.is_unimplemented()
    }
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:", self.addr_start)?;
        for byte in &self.bytes {
            write!(f, " {byte:02X}")?;
        }
        for _ in self.bytes.len()..3 {
            f.write_str("   ")?;
        }
        write!(f, "  {}", self.text)
    }
}

const fn signed(byte: u8) -> i8 {
    i8::from_ne_bytes([byte])
}

fn substitute(instruction: &Instruction, next_pc: u16, immediate: &[u8]) -> String {
    let template = instruction.to_string();
    let (placeholder, value) = match (instruction.operation, immediate) {
        (Operation::JumpRelative { .. }, [offset]) => {
            let target = next_pc.wrapping_add_signed(i16::from(signed(*offset)));
            ("e8", format!("${target:04X}"))
        }
        (Operation::LoadHlSpOffset, [offset]) => ("+e8", format!("{:+}", signed(*offset))),
        (Operation::AddSpOffset, [offset]) => ("e8", signed(*offset).to_string()),
        (Operation::StoreHigh | Operation::LoadHigh, [offset]) => {
            ("a8", format!("$FF{offset:02X}"))
        }
        (_, [value]) => ("d8", format!("${value:02X}")),
        (_, [low, high]) => {
            let word = u16::from_le_bytes([*low, *high]);
            let placeholder = if template.contains("a16") { "a16" } else { "d16" };
            (placeholder, format!("${word:04X}"))
        }
        _ => return template,
    };
    template.replacen(placeholder, &value, 1)
}

/// Disassembles the instruction at `addr`.
///
/// Returns `None` when any byte of the instruction lies outside `memory`.
#[must_use]
pub fn disassemble_one(addr: u16, memory: &[u8]) -> Option<DisassemblyRow> {
    let byte_at = |offset: u16| memory.get(usize::from(addr.wrapping_add(offset))).copied();

    let opcode = byte_at(0)?;
    let instruction = if opcode == PREFIX_BYTE {
        Decoder::decode_prefixed(byte_at(1)?)
    } else {
        Decoder::decode(opcode)
    };

    let len = u16::from(instruction.encoded_len());
    let bytes = (0..len).map(byte_at).collect::<Option<Vec<u8>>>()?;
    let opcode_len = if instruction.opcode.is_prefixed() { 2 } else { 1 };
    let text = substitute(&instruction, addr.wrapping_add(len), &bytes[opcode_len..]);

    Some(DisassemblyRow {
        addr_start: addr,
        bytes,
        instruction,
        text,
    })
}

/// Disassembles up to `count` consecutive instructions starting at `start`.
///
/// Stops early at the first instruction that does not fit in `memory`.
#[must_use]
pub fn disassemble_window(start: u16, count: usize, memory: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut addr = start;
    while rows.len() < count {
        let Some(row) = disassemble_one(addr, memory) else {
            break;
        };
        addr = addr.wrapping_add(u16::from(row.instruction.encoded_len()));
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{disassemble_one, disassemble_window};
    use crate::decoder::Decoder;

    #[test]
    fn placeholders_name_operand_width() {
        assert_eq!(Decoder::decode(0x46).to_string(), "LD B,(HL)");
        assert_eq!(Decoder::decode(0x20).to_string(), "JR NZ,e8");
        assert_eq!(Decoder::decode(0x01).to_string(), "LD BC,d16");
        assert_eq!(Decoder::decode(0xC0).to_string(), "RET NZ");
        assert_eq!(Decoder::decode(0xC9).to_string(), "RET");
        assert_eq!(Decoder::decode(0xFF).to_string(), "RST 38H");
        assert_eq!(Decoder::decode(0x2A).to_string(), "LD A,(HL+)");
        assert_eq!(Decoder::decode(0x90).to_string(), "SUB B");
        assert_eq!(Decoder::decode(0x8E).to_string(), "ADC A,(HL)");
        assert_eq!(Decoder::decode(0xD3).to_string(), "ILLEGAL 0xD3");
        assert_eq!(Decoder::decode_prefixed(0x7C).to_string(), "BIT 7,H");
        assert_eq!(Decoder::decode_prefixed(0x36).to_string(), "SWAP (HL)");
    }

    #[test]
    fn immediates_are_substituted() {
        let memory = [0x3E, 0x12, 0x21, 0x34, 0x12, 0xE0, 0x44, 0xF8, 0xFE];
        let rows = disassemble_window(0, 4, &memory);
        let texts: Vec<_> = rows.iter().map(|row| row.text.as_str()).collect();
        assert_eq!(
            texts,
            ["LD A,$12", "LD HL,$1234", "LDH ($FF44),A", "LD HL,SP-2"]
        );
        assert_eq!(rows[1].len_bytes(), 3);
    }

    #[test]
    fn relative_jump_shows_absolute_target() {
        let memory = [0x00, 0x18, 0xFD];
        let row = disassemble_one(1, &memory).expect("fits");
        assert_eq!(row.text, "JR $0000");
        assert_eq!(row.to_string(), "0001: 18 FD     JR $0000");
    }

    #[test]
    fn prefixed_rows_span_two_bytes() {
        let memory = [0xCB, 0x11];
        let row = disassemble_one(0, &memory).expect("fits");
        assert_eq!(row.text, "RL C");
        assert_eq!(row.bytes, vec![0xCB, 0x11]);
        assert!(!row.is_illegal());
    }

    #[test]
    fn truncated_instruction_is_omitted() {
        let memory = [0x00, 0xC3, 0x00];
        assert!(disassemble_one(1, &memory).is_none());
        assert_eq!(disassemble_window(0, 8, &memory).len(), 1);
        assert!(disassemble_one(0, &[0xDD]).is_some_and(|row| row.is_illegal()));
    }
}
