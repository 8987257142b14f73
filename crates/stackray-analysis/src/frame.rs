//! Stack frame layout and parameter emission.
//!
//! Instruction scheduling may spill arguments in any order; ABI positional
//! order is reconstructed from the slot displacements alone: stack-passed
//! arguments sit at positive displacements growing away from the frame
//! base, spilled register arguments at negative displacements growing
//! toward the locals.

use stackray_core::{OperandRef, SizeKeyword};

use crate::state::SymbolicState;

/// A recovered parameter: the frame slot it lives in and the width class
/// of that slot. The size keyword is a placeholder type, a width-only
/// approximation rather than recovered type information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Raw slot text, e.g. `DWORD PTR [rbp+0x10]`.
    pub slot: String,
    /// Width class from the slot's size keyword, when the text carries one.
    pub size: Option<SizeKeyword>,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.size {
            Some(keyword) => f.write_str(keyword.as_str()),
            None => f.write_str(&self.slot),
        }
    }
}

/// Orders the discovered stack-slot keys into calling-convention position:
/// positive displacements by magnitude descending, then negative
/// displacements by magnitude ascending.
///
/// Keys that do not parse as frame memory references (unhandled global or
/// SIB addressing) are left out of the layout.
pub fn sorted_stack_frame(state: &SymbolicState) -> Vec<String> {
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    for key in state.stack_frame().keys() {
        let Some(mem) = OperandRef::parse(key).as_memory().cloned() else {
            continue;
        };
        if mem.displacement >= 0 {
            positive.push((mem.displacement, key.clone()));
        } else {
            negative.push((mem.displacement, key.clone()));
        }
    }
    // Slot keys are unique, so ties can only come from the same
    // displacement under different size keywords; the text breaks them.
    positive.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    negative.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    positive
        .into_iter()
        .chain(negative)
        .map(|(_, key)| key)
        .collect()
}

/// Maps each sorted slot to a parameter descriptor.
pub fn build_parameters(state: &SymbolicState) -> Vec<Parameter> {
    sorted_stack_frame(state)
        .into_iter()
        .map(|slot| {
            let size = OperandRef::parse(&slot)
                .as_memory()
                .and_then(|mem| mem.size);
            Parameter { slot, size }
        })
        .collect()
}
