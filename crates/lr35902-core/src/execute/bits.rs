//! Rotates, shifts, and single-bit operations of the prefixed table.

use crate::encoding::ShiftOp;
use crate::state::Flags;

/// Applies a rotate/shift/swap. `Z` reflects the result; callers running the
/// accumulator forms clear it afterwards.
pub fn shift(op: ShiftOp, value: u8, carry_in: bool) -> (u8, Flags) {
    let (result, carry) = match op {
        ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        ShiftOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
        ShiftOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
        ShiftOp::Sla => (value << 1, value & 0x80 != 0),
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        ShiftOp::Swap => (value.rotate_left(4), false),
        ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
    };
    let flags = Flags {
        zero: result == 0,
        subtract: false,
        half_carry: false,
        carry,
    };
    (result, flags)
}

/// `BIT b`: `Z` is the complement of the tested bit, carry is preserved.
pub fn test_bit(bit: u8, value: u8, flags: Flags) -> Flags {
    Flags {
        zero: value & (1 << (bit & 0x07)) == 0,
        subtract: false,
        half_carry: true,
        carry: flags.carry,
    }
}

/// `SET b` when `set`, `RES b` otherwise. No flag effect.
pub const fn with_bit(bit: u8, value: u8, set: bool) -> u8 {
    let mask = 1 << (bit & 0x07);
    if set {
        value | mask
    } else {
        value & !mask
    }
}
