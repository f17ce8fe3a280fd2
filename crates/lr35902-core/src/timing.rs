use crate::encoding::Operation;

/// Instruction classes with a fixed internal (non-bus) cycle cost.
///
/// Bus traffic is charged separately by [`crate::memory::MemoryBus`]: one
/// cycle per opcode, prefix, immediate, or data byte and one per `(HL)`
/// operand resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CycleCostKind {
    /// No internal work beyond the bus accesses.
    Plain,
    /// 16-bit increment/decrement, `ADD HL,rr`, `LD SP,HL`, `LD HL,SP+e8`.
    WideAlu,
    /// `ADD SP,e8`.
    StackOffset,
    /// Conditional `RET`; the condition check takes a cycle of its own.
    ConditionalReturn,
    /// `PUSH rr` and `RST n`.
    StackWrite,
}

/// Single source-of-truth table of internal cycle costs.
pub const CYCLE_COST_TABLE: &[(CycleCostKind, u8)] = &[
    (CycleCostKind::Plain, 0),
    (CycleCostKind::WideAlu, 1),
    (CycleCostKind::StackOffset, 2),
    (CycleCostKind::ConditionalReturn, 1),
    (CycleCostKind::StackWrite, 1),
];

/// Extra internal cycle charged when a jump, call, or return is taken.
pub const TAKEN_BRANCH_CYCLES: u8 = 1;

/// Looks up the internal cycle cost for a cost kind.
#[must_use]
pub const fn cycle_cost(kind: CycleCostKind) -> Option<u8> {
    let mut index = 0;
    while index < CYCLE_COST_TABLE.len() {
        let (entry_kind, cycles) = CYCLE_COST_TABLE[index];
        if entry_kind as u8 == kind as u8 {
            return Some(cycles);
        }
        index += 1;
    }
    None
}

/// Classifies an operation for cycle accounting.
#[must_use]
pub const fn cost_kind(operation: &Operation) -> CycleCostKind {
    match operation {
        Operation::IncPair { .. }
        | Operation::DecPair { .. }
        | Operation::AddHl { .. }
        | Operation::LoadSpHl
        | Operation::LoadHlSpOffset => CycleCostKind::WideAlu,
        Operation::AddSpOffset => CycleCostKind::StackOffset,
        Operation::Return { cond: Some(_) } => CycleCostKind::ConditionalReturn,
        Operation::Push { .. } | Operation::Restart { .. } => CycleCostKind::StackWrite,
        _ => CycleCostKind::Plain,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{cost_kind, cycle_cost, CycleCostKind, CYCLE_COST_TABLE};
    use crate::encoding::{Condition, Operation};
    use crate::state::{Operand8, Reg16, Reg8, StackPair};

    #[test]
    fn table_contains_unique_kinds() {
        let kinds: HashSet<_> = CYCLE_COST_TABLE.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds.len(), CYCLE_COST_TABLE.len());
    }

    #[test]
    fn every_table_entry_resolves_via_lookup() {
        for (kind, expected_cycles) in CYCLE_COST_TABLE {
            assert_eq!(cycle_cost(*kind), Some(*expected_cycles));
        }
    }

    #[test]
    fn register_and_indirect_forms_share_a_cost_kind() {
        let reg = Operation::IncByte {
            target: Operand8::Reg(Reg8::B),
        };
        let hl = Operation::IncByte {
            target: Operand8::IndirectHl,
        };
        assert_eq!(cost_kind(&reg), cost_kind(&hl));
        assert_eq!(cost_kind(&reg), CycleCostKind::Plain);
    }

    #[test]
    fn internal_work_is_classified() {
        assert_eq!(
            cost_kind(&Operation::IncPair { pair: Reg16::SP }),
            CycleCostKind::WideAlu
        );
        assert_eq!(
            cost_kind(&Operation::AddSpOffset),
            CycleCostKind::StackOffset
        );
        assert_eq!(
            cost_kind(&Operation::Return {
                cond: Some(Condition::Zero)
            }),
            CycleCostKind::ConditionalReturn
        );
        assert_eq!(
            cost_kind(&Operation::Return { cond: None }),
            CycleCostKind::Plain
        );
        assert_eq!(
            cost_kind(&Operation::Push {
                pair: StackPair::AF
            }),
            CycleCostKind::StackWrite
        );
        assert_eq!(cycle_cost(CycleCostKind::StackOffset), Some(2));
    }
}
