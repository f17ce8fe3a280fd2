//! Runs a small program one video frame at a time and prints a listing.

use log as _;
use lr35902_core::{disassemble_window, CoreState, CpuError, Reg8, CYCLES_PER_FRAME};
use proptest as _;
use rstest as _;
use thiserror as _;

/// Counts `B` down from 0xFF in an outer loop of `C` passes, then halts.
const PROGRAM: [u8; 11] = [
    0x0E, 0x40, // LD C,0x40
    0x06, 0xFF, // outer: LD B,0xFF
    0x05, // inner: DEC B
    0x20, 0xFD, // JR NZ,inner
    0x0D, // DEC C
    0x20, 0xF8, // JR NZ,outer
    0x76, // HALT
];

fn main() {
    for row in disassemble_window(0, 7, &PROGRAM) {
        println!("{row}");
    }

    let mut state = CoreState::default();
    if let Err(err) = state.load_program(0, &PROGRAM) {
        eprintln!("load failed: {err}");
        return;
    }

    let mut frame = 0u32;
    loop {
        let outcome = state.run_for_cycles(CYCLES_PER_FRAME);
        frame += 1;
        println!(
            "frame {frame:>3}: {:>5} steps, {:>5} cycles, C={:02X} B={:02X}",
            outcome.steps,
            outcome.cycles,
            state.regs.reg(Reg8::C),
            state.regs.reg(Reg8::B),
        );
        match outcome.stop {
            None => {}
            Some(CpuError::Halted) => break,
            Some(fault) => {
                eprintln!("fault at {:04X}: {fault}", state.regs.pc());
                break;
            }
        }
    }

    println!("halted after {} cycles", state.cycles());
}
