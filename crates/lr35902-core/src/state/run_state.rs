use crate::CpuError;

/// Execution state of the core.
///
/// `Halted` and `Faulted` are terminal: no transition leaves them other than
/// an explicit reset by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// `HALT` or `STOP` retired.
    Halted,
    /// A fault latched; the payload is returned by every later step.
    Faulted(CpuError),
}

impl RunState {
    /// Returns the signal a step must report in this state, if terminal.
    #[must_use]
    pub const fn terminal_error(self) -> Option<CpuError> {
        match self {
            Self::Running => None,
            Self::Halted => Some(CpuError::Halted),
            Self::Faulted(cause) => Some(cause),
        }
    }

    /// Returns the currently latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<CpuError> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }
}
