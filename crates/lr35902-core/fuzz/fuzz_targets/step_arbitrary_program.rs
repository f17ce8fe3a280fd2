#![no_main]

use libfuzzer_sys::fuzz_target;
use lr35902_core::{
    disassemble_window, CoreConfig, CoreState, CpuError, RunState, ADDRESS_SPACE_BYTES,
};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, program)) = data.split_first() else {
        return;
    };

    let config = CoreConfig {
        memory_bytes: if selector & 0x01 == 0 {
            0x2000
        } else {
            ADDRESS_SPACE_BYTES
        },
        initial_pc: u16::from(selector >> 1),
        ..CoreConfig::default()
    };
    let mut state = CoreState::with_config(&config);
    if state.load_program(0, program).is_err() {
        return;
    }

    let _ = disassemble_window(0, 32, state.bus.as_slice());

    let outcome = state.run_for_cycles(4_096);
    match (outcome.stop, state.run_state()) {
        (None, RunState::Running) | (Some(CpuError::Halted), RunState::Halted) => {}
        (Some(stop), RunState::Faulted(latched)) => assert_eq!(stop, latched),
        (stop, run_state) => panic!("stop {stop:?} disagrees with {run_state:?}"),
    }
    assert_eq!(outcome.cycles, state.cycles());
});
