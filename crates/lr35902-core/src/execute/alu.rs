//! Pure 8-bit and 16-bit arithmetic with flag computation.

use crate::encoding::AluOp;
use crate::state::Flags;

/// `A + value + carry`.
pub fn add8(a: u8, value: u8, carry: bool) -> (u8, Flags) {
    let carry_in = u8::from(carry);
    let wide = u16::from(a) + u16::from(value) + u16::from(carry_in);
    let result = wide as u8;
    let flags = Flags {
        zero: result == 0,
        subtract: false,
        half_carry: (a & 0x0F) + (value & 0x0F) + carry_in > 0x0F,
        carry: wide > 0xFF,
    };
    (result, flags)
}

/// `A - value - carry`.
pub fn sub8(a: u8, value: u8, carry: bool) -> (u8, Flags) {
    let carry_in = u8::from(carry);
    let result = a.wrapping_sub(value).wrapping_sub(carry_in);
    let flags = Flags {
        zero: result == 0,
        subtract: true,
        half_carry: (a & 0x0F) < (value & 0x0F) + carry_in,
        carry: u16::from(a) < u16::from(value) + u16::from(carry_in),
    };
    (result, flags)
}

fn logic(result: u8, half_carry: bool) -> (u8, Flags) {
    let flags = Flags {
        zero: result == 0,
        subtract: false,
        half_carry,
        carry: false,
    };
    (result, flags)
}

/// Applies an accumulator operation. Returns `None` as the result for `CP`,
/// which only updates flags.
pub fn accumulate(op: AluOp, a: u8, value: u8, flags: Flags) -> (Option<u8>, Flags) {
    let (result, flags) = match op {
        AluOp::Add => add8(a, value, false),
        AluOp::Adc => add8(a, value, flags.carry),
        AluOp::Sub | AluOp::Cp => sub8(a, value, false),
        AluOp::Sbc => sub8(a, value, flags.carry),
        AluOp::And => logic(a & value, true),
        AluOp::Xor => logic(a ^ value, false),
        AluOp::Or => logic(a | value, false),
    };
    if op == AluOp::Cp {
        (None, flags)
    } else {
        (Some(result), flags)
    }
}

/// `INC` on a byte; carry is preserved.
pub fn inc8(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_add(1);
    let flags = Flags {
        zero: result == 0,
        subtract: false,
        half_carry: value & 0x0F == 0x0F,
        carry: flags.carry,
    };
    (result, flags)
}

/// `DEC` on a byte; carry is preserved.
pub fn dec8(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_sub(1);
    let flags = Flags {
        zero: result == 0,
        subtract: true,
        half_carry: value & 0x0F == 0x00,
        carry: flags.carry,
    };
    (result, flags)
}

/// `ADD HL,rr`; zero is preserved.
pub fn add16_hl(hl: u16, value: u16, flags: Flags) -> (u16, Flags) {
    let (result, carry) = hl.overflowing_add(value);
    let flags = Flags {
        zero: flags.zero,
        subtract: false,
        half_carry: (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF,
        carry,
    };
    (result, flags)
}

/// `SP + e8` as used by `ADD SP,e8` and `LD HL,SP+e8`.
///
/// Half-carry and carry come from the unsigned add of the low byte.
pub fn add_sp_offset(sp: u16, offset: u8) -> (u16, Flags) {
    let signed = i16::from(offset as i8) as u16;
    let result = sp.wrapping_add(signed);
    let low = sp & 0x00FF;
    let operand = u16::from(offset);
    let flags = Flags {
        zero: false,
        subtract: false,
        half_carry: (low & 0x0F) + (operand & 0x0F) > 0x0F,
        carry: low + operand > 0xFF,
    };
    (result, flags)
}

/// Decimal adjust after a BCD add or subtract.
pub fn daa(a: u8, flags: Flags) -> (u8, Flags) {
    let mut adjust = 0u8;
    let mut carry = flags.carry;
    let result = if flags.subtract {
        if flags.carry {
            adjust |= 0x60;
        }
        if flags.half_carry {
            adjust |= 0x06;
        }
        a.wrapping_sub(adjust)
    } else {
        if flags.carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        if flags.half_carry || a & 0x0F > 0x09 {
            adjust |= 0x06;
        }
        a.wrapping_add(adjust)
    };
    let flags = Flags {
        zero: result == 0,
        subtract: flags.subtract,
        half_carry: false,
        carry,
    };
    (result, flags)
}

#[cfg(test)]
mod tests {
    use super::{accumulate, add16_hl, add8, add_sp_offset, daa, dec8, inc8, sub8};
    use crate::encoding::AluOp;
    use crate::state::Flags;

    const fn flags(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Flags {
        Flags {
            zero,
            subtract,
            half_carry,
            carry,
        }
    }

    #[test]
    fn add_sets_half_carry_across_nibble() {
        assert_eq!(add8(0x0F, 0x01, false), (0x10, flags(false, false, true, false)));
        assert_eq!(add8(0xFF, 0x01, false), (0x00, flags(true, false, true, true)));
    }

    #[test]
    fn adc_folds_carry_into_both_nibbles() {
        assert_eq!(add8(0x0E, 0x01, true), (0x10, flags(false, false, true, false)));
        assert_eq!(add8(0xFE, 0x01, true), (0x00, flags(true, false, true, true)));
    }

    #[test]
    fn sub_sets_borrow_flags() {
        assert_eq!(sub8(0x10, 0x01, false), (0x0F, flags(false, true, true, false)));
        assert_eq!(sub8(0x00, 0x01, false), (0xFF, flags(false, true, true, true)));
        assert_eq!(sub8(0x42, 0x42, false), (0x00, flags(true, true, false, false)));
    }

    #[test]
    fn sbc_borrows_through_carry() {
        assert_eq!(sub8(0x10, 0x0F, true), (0x00, flags(true, true, true, false)));
        assert_eq!(sub8(0x00, 0xFF, true), (0x00, flags(true, true, true, true)));
    }

    #[test]
    fn logic_ops_clear_carry() {
        let dirty = flags(false, true, false, true);
        assert_eq!(
            accumulate(AluOp::And, 0xF0, 0x0F, dirty),
            (Some(0x00), flags(true, false, true, false))
        );
        assert_eq!(
            accumulate(AluOp::Xor, 0x5A, 0x5A, dirty),
            (Some(0x00), flags(true, false, false, false))
        );
        assert_eq!(
            accumulate(AluOp::Or, 0x50, 0x0A, dirty),
            (Some(0x5A), flags(false, false, false, false))
        );
    }

    #[test]
    fn compare_reports_flags_only() {
        assert_eq!(
            accumulate(AluOp::Cp, 0x10, 0x01, Flags::default()),
            (None, flags(false, true, true, false))
        );
    }

    #[test]
    fn inc_dec_preserve_carry() {
        let carry = flags(false, false, false, true);
        assert_eq!(inc8(0x0F, carry), (0x10, flags(false, false, true, true)));
        assert_eq!(inc8(0xFF, carry), (0x00, flags(true, false, true, true)));
        assert_eq!(dec8(0x10, carry), (0x0F, flags(false, true, true, true)));
        assert_eq!(dec8(0x01, Flags::default()), (0x00, flags(true, true, false, false)));
    }

    #[test]
    fn add_hl_uses_bit_eleven_and_fifteen() {
        let zero = flags(true, true, false, false);
        assert_eq!(
            add16_hl(0x0FFF, 0x0001, zero),
            (0x1000, flags(true, false, true, false))
        );
        assert_eq!(
            add16_hl(0xFFFF, 0x0001, Flags::default()),
            (0x0000, flags(false, false, true, true))
        );
    }

    #[test]
    fn sp_offset_flags_come_from_low_byte() {
        assert_eq!(
            add_sp_offset(0xFFF8, 0x08),
            (0x0000, flags(false, false, true, true))
        );
        assert_eq!(
            add_sp_offset(0x1000, 0xFF),
            (0x0FFF, flags(false, false, false, false))
        );
        assert_eq!(
            add_sp_offset(0x00FF, 0xFF),
            (0x00FE, flags(false, false, true, true))
        );
    }

    #[test]
    fn daa_corrects_bcd_results() {
        let (sum, add_flags) = add8(0x15, 0x27, false);
        assert_eq!(daa(sum, add_flags), (0x42, flags(false, false, false, false)));

        let (sum, add_flags) = add8(0x99, 0x01, false);
        assert_eq!(daa(sum, add_flags), (0x00, flags(true, false, false, true)));

        let (diff, sub_flags) = sub8(0x42, 0x15, false);
        assert_eq!(daa(diff, sub_flags), (0x27, flags(false, true, false, false)));
    }
}
