//! Prologue/body boundary detection.
//!
//! Unoptimized compiler prologues spill register-passed arguments to the
//! stack frame before any local variable is touched. The first instruction
//! that *reads* a frame slot at a negative displacement is therefore the
//! start of the function body; everything before it is the prologue the
//! tracker replays.

use stackray_core::{Instruction, OperandRef};

/// Frame-base register displacements are measured against.
pub const FRAME_BASE: &str = "rbp";

/// Returns the index of the first instruction whose source operand reads a
/// frame slot at a negative displacement (a true local-variable access).
///
/// Non-negative displacements are incoming-argument slots and do not end
/// the prologue. If no local read exists the whole sequence is treated as
/// prologue and the sequence length is returned.
pub fn prologue_boundary(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .position(reads_local)
        .unwrap_or(instructions.len())
}

fn reads_local(inst: &Instruction) -> bool {
    let Some(src) = inst.source() else {
        return false;
    };
    match OperandRef::parse(src).as_memory() {
        Some(mem) => mem.base == FRAME_BASE && mem.displacement < 0,
        None => false,
    }
}
