//! Flag vectors for the 8-bit ALU, driven through the step loop.

#![allow(clippy::pedantic, clippy::nursery, clippy::fn_params_excessive_bools)]

use log as _;
use lr35902_core::{CoreState, Flags, Reg8};
use proptest as _;
use rstest::rstest;
use thiserror as _;

const fn flags(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Flags {
    Flags {
        zero,
        subtract,
        half_carry,
        carry,
    }
}

/// Runs `LD A,a` then `<op> A,d8` with the given carry-in.
fn run_immediate(opcode: u8, a: u8, operand: u8, carry: bool) -> (u8, Flags) {
    let mut state = CoreState::default();
    state
        .load_program(0, &[0x3E, a, opcode, operand])
        .expect("program fits");
    state.regs.flags_mut().carry = carry;
    state.step().expect("LD A,d8");
    assert_eq!(state.step(), Ok(2), "immediate ALU ops cost two cycles");
    (state.regs.a(), state.regs.flags())
}

#[rstest]
#[case::add_half_carry(0xC6, 0x0F, 0x01, false, 0x10, flags(false, false, true, false))]
#[case::add_wraps_to_zero(0xC6, 0xFF, 0x01, false, 0x00, flags(true, false, true, true))]
#[case::adc_carry_in(0xCE, 0xFF, 0x00, true, 0x00, flags(true, false, true, true))]
#[case::adc_without_carry(0xCE, 0x12, 0x34, false, 0x46, flags(false, false, false, false))]
#[case::sub_half_borrow(0xD6, 0x10, 0x01, false, 0x0F, flags(false, true, true, false))]
#[case::sub_borrow(0xD6, 0x01, 0x02, false, 0xFF, flags(false, true, true, true))]
#[case::sbc_borrow_in(0xDE, 0x00, 0x00, true, 0xFF, flags(false, true, true, true))]
#[case::and_sets_half_carry(0xE6, 0xF0, 0x0F, true, 0x00, flags(true, false, true, false))]
#[case::xor_clears_carry(0xEE, 0xFF, 0x0F, true, 0xF0, flags(false, false, false, false))]
#[case::or_zero(0xF6, 0x00, 0x00, true, 0x00, flags(true, false, false, false))]
#[case::cp_equal_keeps_a(0xFE, 0x42, 0x42, false, 0x42, flags(true, true, false, false))]
#[case::cp_borrow_keeps_a(0xFE, 0x10, 0x20, false, 0x10, flags(false, true, false, true))]
fn immediate_alu_vectors(
    #[case] opcode: u8,
    #[case] a: u8,
    #[case] operand: u8,
    #[case] carry: bool,
    #[case] expected_a: u8,
    #[case] expected: Flags,
) {
    assert_eq!(run_immediate(opcode, a, operand, carry), (expected_a, expected));
}

#[test]
fn xor_a_clears_accumulator() {
    let mut state = CoreState::default();
    state.load_program(0, &[0x3E, 0x5A, 0xAF]).expect("fits");
    state.regs.flags_mut().carry = true;
    state.step().expect("LD A,d8");
    assert_eq!(state.step(), Ok(1));
    assert_eq!(state.regs.a(), 0);
    assert_eq!(state.regs.flags(), flags(true, false, false, false));
}

#[rstest]
#[case::inc_nibble_wrap(0x04, 0x0F, 0x10, flags(false, false, true, true))]
#[case::inc_to_zero(0x04, 0xFF, 0x00, flags(true, false, true, true))]
#[case::dec_nibble_borrow(0x05, 0x10, 0x0F, flags(false, true, true, true))]
#[case::dec_to_zero(0x05, 0x01, 0x00, flags(true, true, false, true))]
fn inc_dec_preserve_carry(
    #[case] opcode: u8,
    #[case] value: u8,
    #[case] expected_value: u8,
    #[case] expected: Flags,
) {
    let mut state = CoreState::default();
    state.load_program(0, &[0x06, value, opcode]).expect("fits");
    state.regs.flags_mut().carry = true;
    state.step().expect("LD B,d8");
    assert_eq!(state.step(), Ok(1));
    assert_eq!(state.regs.reg(Reg8::B), expected_value);
    assert_eq!(state.regs.flags(), expected);
}

#[rstest]
#[case::add_then_adjust(0x45, 0xC6, 0x38, 0x83, false)]
#[case::carry_out(0x99, 0xC6, 0x01, 0x00, true)]
#[case::subtract_then_adjust(0x42, 0xD6, 0x15, 0x27, false)]
fn daa_produces_packed_bcd(
    #[case] a: u8,
    #[case] opcode: u8,
    #[case] operand: u8,
    #[case] expected: u8,
    #[case] carry: bool,
) {
    let mut state = CoreState::default();
    state
        .load_program(0, &[0x3E, a, opcode, operand, 0x27])
        .expect("fits");
    for _ in 0..3 {
        state.step().expect("program retires");
    }
    assert_eq!(state.regs.a(), expected);
    assert_eq!(state.regs.flags().carry, carry);
    assert!(!state.regs.flags().half_carry);
}

#[test]
fn accumulator_rotates_always_clear_zero() {
    let mut state = CoreState::default();
    state.load_program(0, &[0x07, 0xCB, 0x07]).expect("fits");
    assert_eq!(state.step(), Ok(1));
    assert_eq!(state.regs.a(), 0);
    assert!(!state.regs.flags().zero);
    assert_eq!(state.step(), Ok(2));
    assert!(state.regs.flags().zero);
}

#[test]
fn accumulator_flag_ops() {
    let mut state = CoreState::default();
    state
        .load_program(0, &[0x3E, 0x0F, 0x2F, 0x37, 0x3F])
        .expect("fits");
    state.step().expect("LD A,d8");
    state.step().expect("CPL");
    assert_eq!(state.regs.a(), 0xF0);
    assert!(state.regs.flags().subtract && state.regs.flags().half_carry);
    state.step().expect("SCF");
    assert_eq!(state.regs.flags(), flags(false, false, false, true));
    state.step().expect("CCF");
    assert_eq!(state.regs.flags(), flags(false, false, false, false));
}

#[test]
fn sixteen_bit_add_leaves_zero_untouched() {
    let mut state = CoreState::default();
    state
        .load_program(0, &[0x21, 0xFF, 0x0F, 0x01, 0x01, 0x00, 0x09])
        .expect("fits");
    state.regs.flags_mut().zero = true;
    state.step().expect("LD HL,d16");
    state.step().expect("LD BC,d16");
    assert_eq!(state.step(), Ok(2));
    assert_eq!(state.regs.hl(), 0x1000);
    assert_eq!(state.regs.flags(), flags(true, false, true, false));
}
