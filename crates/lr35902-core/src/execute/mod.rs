//! Instruction execution and the fetch/decode/execute step loop.
//!
//! Every step is precise: when an instruction faults, the register file is
//! restored to its pre-fetch value and no memory write of that instruction is
//! visible. Memory writes are always the last bus access of an instruction,
//! and 16-bit writes validate both bytes before storing either.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    unknown_lints,
    missing_docs
)]

pub mod alu;
pub mod bits;

use crate::api::{CoreState, RunOutcome, TraceEvent, TraceSink};
use crate::decoder::{Decoder, Instruction};
use crate::encoding::{AluOp, Condition, Operation, PairIndirect, PREFIX_BYTE};
use crate::memory::MemoryBus;
use crate::state::{Flags, OperandRef, Reg16, Reg8, Registers, RunState};
use crate::timing::TAKEN_BRANCH_CYCLES;
use crate::CpuError;

/// Base of the high page addressed by `LDH` and `LD (C)`.
const HIGH_PAGE: u16 = 0xFF00;

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    /// Instruction retired; execution continues.
    Retired,
    /// `HALT` or `STOP` retired.
    Halted,
}

fn fetch_byte(regs: &mut Registers, bus: &mut MemoryBus) -> Result<u8, CpuError> {
    let value = bus.read(regs.pc())?;
    regs.set_pc(regs.pc().wrapping_add(1));
    Ok(value)
}

fn fetch_word(regs: &mut Registers, bus: &mut MemoryBus) -> Result<u16, CpuError> {
    let value = bus.read_word(regs.pc())?;
    regs.set_pc(regs.pc().wrapping_add(2));
    Ok(value)
}

/// Fetches an opcode at `PC` and looks it up, following a `0xCB` prefix into
/// the second table.
pub fn fetch_instruction(regs: &mut Registers, bus: &mut MemoryBus) -> Result<Instruction, CpuError> {
    let opcode = fetch_byte(regs, bus)?;
    if opcode == PREFIX_BYTE {
        let suffix = fetch_byte(regs, bus)?;
        return Ok(Decoder::decode_prefixed(suffix));
    }
    Ok(Decoder::decode(opcode))
}

fn push_word(regs: &mut Registers, bus: &mut MemoryBus, value: u16) -> Result<(), CpuError> {
    let top = regs.sp().wrapping_sub(2);
    bus.write_word(top, value)?;
    regs.set_sp(top);
    Ok(())
}

fn pop_word(regs: &mut Registers, bus: &mut MemoryBus) -> Result<u16, CpuError> {
    let value = bus.read_word(regs.sp())?;
    regs.set_sp(regs.sp().wrapping_add(2));
    Ok(value)
}

const fn condition_holds(cond: Option<Condition>, flags: Flags) -> bool {
    match cond {
        None => true,
        Some(Condition::NotZero) => !flags.zero,
        Some(Condition::Zero) => flags.zero,
        Some(Condition::NotCarry) => !flags.carry,
        Some(Condition::Carry) => flags.carry,
    }
}

fn indirect_address(regs: &Registers, pair: PairIndirect) -> u16 {
    match pair {
        PairIndirect::Bc => regs.pair(Reg16::BC),
        PairIndirect::De => regs.pair(Reg16::DE),
        PairIndirect::HlIncrement | PairIndirect::HlDecrement => regs.hl(),
    }
}

fn adjust_hl(regs: &mut Registers, pair: PairIndirect) {
    match pair {
        PairIndirect::HlIncrement => regs.inc_pair(Reg16::HL),
        PairIndirect::HlDecrement => regs.dec_pair(Reg16::HL),
        PairIndirect::Bc | PairIndirect::De => {}
    }
}

fn relative_target(pc: u16, offset: u8) -> u16 {
    pc.wrapping_add(i16::from(offset as i8) as u16)
}

/// Executes one decoded instruction against the core.
///
/// `PC` must already point past the opcode (and prefix). Immediates are
/// fetched here. Internal cycles from the instruction entry and taken
/// branches are charged to the bus. `Prefix` entries are consumed by
/// [`fetch_instruction`]; executing one directly reports it as
/// unimplemented.
#[allow(clippy::too_many_lines)]
pub fn execute_instruction(
    instruction: &Instruction,
    state: &mut CoreState,
) -> Result<ExecuteOutcome, CpuError> {
    let CoreState { regs, bus, .. } = state;
    bus.tick(instruction.cycles);

    match instruction.operation {
        Operation::Nop => {}
        Operation::Halt => return Ok(ExecuteOutcome::Halted),
        Operation::Stop => {
            fetch_byte(regs, bus)?;
            return Ok(ExecuteOutcome::Halted);
        }
        Operation::Prefix => {
            return Err(CpuError::Unimplemented {
                opcode: instruction.opcode,
            })
        }
        Operation::Unimplemented { opcode } => return Err(CpuError::Unimplemented { opcode }),

        Operation::LoadImm16 { dst } => {
            let value = fetch_word(regs, bus)?;
            regs.set_pair(dst, value);
        }
        Operation::LoadImm8 { dst } => {
            let value = fetch_byte(regs, bus)?;
            let target = OperandRef::resolve(dst, regs, bus)?;
            target.set(regs, bus, value);
        }
        Operation::Load { dst, src } => {
            let source = OperandRef::resolve(src, regs, bus)?;
            let value = source.get(regs, bus);
            let target = OperandRef::resolve(dst, regs, bus)?;
            target.set(regs, bus, value);
        }
        Operation::StoreIndirect { pair } => {
            let addr = indirect_address(regs, pair);
            bus.write(addr, regs.a())?;
            adjust_hl(regs, pair);
        }
        Operation::LoadIndirect { pair } => {
            let addr = indirect_address(regs, pair);
            let value = bus.read(addr)?;
            regs.set_a(value);
            adjust_hl(regs, pair);
        }
        Operation::StoreHigh => {
            let offset = fetch_byte(regs, bus)?;
            bus.write(HIGH_PAGE | u16::from(offset), regs.a())?;
        }
        Operation::LoadHigh => {
            let offset = fetch_byte(regs, bus)?;
            let value = bus.read(HIGH_PAGE | u16::from(offset))?;
            regs.set_a(value);
        }
        Operation::StoreHighC => {
            let addr = HIGH_PAGE | u16::from(regs.reg(Reg8::C));
            bus.write(addr, regs.a())?;
        }
        Operation::LoadHighC => {
            let addr = HIGH_PAGE | u16::from(regs.reg(Reg8::C));
            let value = bus.read(addr)?;
            regs.set_a(value);
        }
        Operation::StoreAbsolute => {
            let addr = fetch_word(regs, bus)?;
            bus.write(addr, regs.a())?;
        }
        Operation::LoadAbsolute => {
            let addr = fetch_word(regs, bus)?;
            let value = bus.read(addr)?;
            regs.set_a(value);
        }
        Operation::StoreSp => {
            let addr = fetch_word(regs, bus)?;
            bus.write_word(addr, regs.sp())?;
        }
        Operation::LoadSpHl => regs.set_sp(regs.hl()),
        Operation::LoadHlSpOffset => {
            let offset = fetch_byte(regs, bus)?;
            let (value, flags) = alu::add_sp_offset(regs.sp(), offset);
            regs.set_pair(Reg16::HL, value);
            regs.set_flags(flags);
        }
        Operation::AddSpOffset => {
            let offset = fetch_byte(regs, bus)?;
            let (value, flags) = alu::add_sp_offset(regs.sp(), offset);
            regs.set_sp(value);
            regs.set_flags(flags);
        }

        Operation::IncPair { pair } => regs.inc_pair(pair),
        Operation::DecPair { pair } => regs.dec_pair(pair),
        Operation::IncByte { target } => {
            let target = OperandRef::resolve(target, regs, bus)?;
            let (value, flags) = alu::inc8(target.get(regs, bus), regs.flags());
            target.set(regs, bus, value);
            regs.set_flags(flags);
        }
        Operation::DecByte { target } => {
            let target = OperandRef::resolve(target, regs, bus)?;
            let (value, flags) = alu::dec8(target.get(regs, bus), regs.flags());
            target.set(regs, bus, value);
            regs.set_flags(flags);
        }
        Operation::Alu { op, src } => {
            let source = OperandRef::resolve(src, regs, bus)?;
            let value = source.get(regs, bus);
            apply_accumulator(regs, op, value);
        }
        Operation::AluImm { op } => {
            let value = fetch_byte(regs, bus)?;
            apply_accumulator(regs, op, value);
        }
        Operation::AddHl { src } => {
            let (value, flags) = alu::add16_hl(regs.hl(), regs.pair(src), regs.flags());
            regs.set_pair(Reg16::HL, value);
            regs.set_flags(flags);
        }
        Operation::RotateA { op } => {
            let (value, mut flags) = bits::shift(op, regs.a(), regs.flags().carry);
            flags.zero = false;
            regs.set_a(value);
            regs.set_flags(flags);
        }
        Operation::Daa => {
            let (value, flags) = alu::daa(regs.a(), regs.flags());
            regs.set_a(value);
            regs.set_flags(flags);
        }
        Operation::Cpl => {
            regs.set_a(!regs.a());
            let flags = regs.flags_mut();
            flags.subtract = true;
            flags.half_carry = true;
        }
        Operation::Scf => {
            let flags = regs.flags_mut();
            flags.subtract = false;
            flags.half_carry = false;
            flags.carry = true;
        }
        Operation::Ccf => {
            let flags = regs.flags_mut();
            flags.subtract = false;
            flags.half_carry = false;
            flags.carry = !flags.carry;
        }

        Operation::JumpRelative { cond } => {
            let offset = fetch_byte(regs, bus)?;
            if condition_holds(cond, regs.flags()) {
                regs.set_pc(relative_target(regs.pc(), offset));
                bus.tick(TAKEN_BRANCH_CYCLES);
            }
        }
        Operation::Jump { cond } => {
            let target = fetch_word(regs, bus)?;
            if condition_holds(cond, regs.flags()) {
                regs.set_pc(target);
                bus.tick(TAKEN_BRANCH_CYCLES);
            }
        }
        Operation::JumpHl => regs.set_pc(regs.hl()),
        Operation::Call { cond } => {
            let target = fetch_word(regs, bus)?;
            if condition_holds(cond, regs.flags()) {
                let return_addr = regs.pc();
                push_word(regs, bus, return_addr)?;
                regs.set_pc(target);
                bus.tick(TAKEN_BRANCH_CYCLES);
            }
        }
        Operation::Return { cond } => {
            if condition_holds(cond, regs.flags()) {
                let target = pop_word(regs, bus)?;
                regs.set_pc(target);
                bus.tick(TAKEN_BRANCH_CYCLES);
            }
        }
        Operation::ReturnInterrupt => {
            let target = pop_word(regs, bus)?;
            regs.set_pc(target);
            regs.set_ime(true);
            bus.tick(TAKEN_BRANCH_CYCLES);
        }
        Operation::Restart { vector } => {
            let return_addr = regs.pc();
            push_word(regs, bus, return_addr)?;
            regs.set_pc(u16::from(vector));
        }
        Operation::Push { pair } => {
            let value = regs.stack_pair(pair);
            push_word(regs, bus, value)?;
        }
        Operation::Pop { pair } => {
            let value = pop_word(regs, bus)?;
            regs.set_stack_pair(pair, value);
        }
        Operation::DisableInterrupts => regs.set_ime(false),
        Operation::EnableInterrupts => regs.set_ime(true),

        Operation::Shift { op, target } => {
            let target = OperandRef::resolve(target, regs, bus)?;
            let (value, flags) = bits::shift(op, target.get(regs, bus), regs.flags().carry);
            target.set(regs, bus, value);
            regs.set_flags(flags);
        }
        Operation::Bit { bit, target } => {
            let target = OperandRef::resolve(target, regs, bus)?;
            let flags = bits::test_bit(bit, target.get(regs, bus), regs.flags());
            regs.set_flags(flags);
        }
        Operation::Res { bit, target } | Operation::Set { bit, target } => {
            let set = matches!(instruction.operation, Operation::Set { .. });
            let target = OperandRef::resolve(target, regs, bus)?;
            let value = bits::with_bit(bit, target.get(regs, bus), set);
            target.set(regs, bus, value);
        }
    }

    Ok(ExecuteOutcome::Retired)
}

fn apply_accumulator(regs: &mut Registers, op: AluOp, value: u8) {
    let (result, flags) = alu::accumulate(op, regs.a(), value, regs.flags());
    if let Some(result) = result {
        regs.set_a(result);
    }
    regs.set_flags(flags);
}

/// Executes one instruction: fetch, decode, execute, and fold the consumed
/// cycles into the bus counter.
///
/// Returns the cycles consumed on success. A terminal state returns its
/// stored signal without touching the core.
///
/// # Errors
///
/// - [`CpuError::Halted`] after `HALT` or `STOP` retires (PC points past it).
/// - [`CpuError::OutOfBounds`] or [`CpuError::Unimplemented`] on a fault;
///   registers are restored to their pre-step values.
pub fn step_one(state: &mut CoreState) -> Result<u32, CpuError> {
    step_inner(state, None)
}

/// Same as [`step_one`], emitting [`TraceEvent`]s to `sink`.
///
/// # Errors
///
/// Same as [`step_one`].
pub fn step_traced(state: &mut CoreState, sink: &mut dyn TraceSink) -> Result<u32, CpuError> {
    step_inner(state, Some(sink))
}

fn step_inner(state: &mut CoreState, mut sink: Option<&mut dyn TraceSink>) -> Result<u32, CpuError> {
    if let Some(signal) = state.run_state.terminal_error() {
        return Err(signal);
    }

    let pc = state.regs.pc();
    let snapshot = state.regs;
    let started = state.bus.elapsed();

    let outcome = match fetch_instruction(&mut state.regs, &mut state.bus) {
        Ok(instruction) => {
            log::trace!("{pc:04X}: {} {instruction}", instruction.opcode);
            if let Some(sink) = sink.as_deref_mut() {
                sink.on_event(TraceEvent::InstructionStart { pc, instruction });
            }
            execute_instruction(&instruction, state)
        }
        Err(cause) => Err(cause),
    };

    let cycles = u32::try_from(state.bus.elapsed() - started).unwrap_or(u32::MAX);

    match outcome {
        Ok(ExecuteOutcome::Retired) => {
            if let Some(sink) = sink {
                sink.on_event(TraceEvent::InstructionRetired { pc, cycles });
            }
            Ok(cycles)
        }
        Ok(ExecuteOutcome::Halted) => {
            state.run_state = RunState::Halted;
            log::debug!(
                "halted at {pc:04X} after {} cycles",
                state.bus.elapsed()
            );
            if let Some(sink) = sink {
                sink.on_event(TraceEvent::Halted { pc });
            }
            Err(CpuError::Halted)
        }
        Err(cause) => {
            state.regs = snapshot;
            state.run_state = RunState::Faulted(cause);
            log::warn!("fault at {pc:04X}: {cause}; registers {:?}", state.regs);
            if let Some(sink) = sink {
                sink.on_event(TraceEvent::FaultRaised { pc, cause });
            }
            Err(cause)
        }
    }
}

/// Steps until at least `budget` cycles have elapsed or a terminal signal is
/// returned.
pub fn run_for_cycles(state: &mut CoreState, budget: u64) -> RunOutcome {
    let started = state.bus.elapsed();
    let mut steps = 0;
    let mut stop = None;

    while state.bus.elapsed() - started < budget {
        match step_one(state) {
            Ok(_) => steps += 1,
            Err(signal) => {
                stop = Some(signal);
                break;
            }
        }
    }

    RunOutcome {
        steps,
        cycles: state.bus.elapsed() - started,
        stop,
    }
}
