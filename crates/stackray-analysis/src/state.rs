//! The symbolic state tracker.
//!
//! Holds the register and stack-frame maps and replays per-family transfer
//! functions over an instruction sequence. This is a forward-only pass:
//! each instruction is applied exactly once, in program order, and state is
//! never rolled back.

use std::collections::HashMap;

use stackray_core::{is_register, Instruction, InstKind, Width};

use crate::value::{BinOpKind, HalfKind, SymbolicValue};
use crate::{AnalysisError, AnalysisResult, Diagnostic};

/// Symbolic register and stack-frame state for one function.
///
/// Registers are keyed by name, stack slots by their raw memory-operand
/// text (`DWORD PTR [rbp-0x4]`), which uniquely identifies a frame-base ±
/// displacement location within a function. Sub-register aliasing is not
/// modeled: `al` and `ax` are distinct keys, as in the transfer functions'
/// contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolicState {
    registers: HashMap<String, SymbolicValue>,
    stack_frame: HashMap<String, SymbolicValue>,
    diagnostics: Vec<Diagnostic>,
}

impl SymbolicState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an operand to its current symbolic value.
    ///
    /// A location that has never been written resolves to the identity
    /// value of its own text.
    pub fn resolve(&self, operand: &str) -> SymbolicValue {
        let map = if is_register(operand) {
            &self.registers
        } else {
            &self.stack_frame
        };
        map.get(operand)
            .cloned()
            .unwrap_or_else(|| SymbolicValue::leaf(operand))
    }

    fn store(&mut self, operand: &str, value: SymbolicValue) {
        let map = if is_register(operand) {
            &mut self.registers
        } else {
            &mut self.stack_frame
        };
        map.insert(operand.to_string(), value);
    }

    /// Applies one instruction's transfer function.
    ///
    /// Must be called exactly once per instruction, in program order.
    /// Instructions without a modeled transfer function leave the state
    /// untouched and are recorded as [`Diagnostic::UnmodeledOpcode`].
    pub fn apply(&mut self, inst: &Instruction) -> AnalysisResult<()> {
        match inst.kind {
            InstKind::Move => match two_operands(inst) {
                Some((dst, src)) => {
                    let value = self.resolve(src);
                    self.store(dst, value);
                }
                None => self.record_unmodeled(inst),
            },
            InstKind::Add => self.accumulate(inst, BinOpKind::Add),
            InstKind::Subtract => self.accumulate(inst, BinOpKind::Sub),
            InstKind::Multiply => match inst.operands.len() {
                1 => self.widening_multiply(inst)?,
                2 => self.checked_multiply(inst)?,
                _ => self.record_unmodeled(inst),
            },
            InstKind::Unmodeled => self.record_unmodeled(inst),
        }
        Ok(())
    }

    /// `dst := dst op src`, both sides resolved before the write.
    fn accumulate(&mut self, inst: &Instruction, op: BinOpKind) {
        let Some((dst, src)) = two_operands(inst) else {
            self.record_unmodeled(inst);
            return;
        };
        let lhs = self.resolve(dst);
        let rhs = self.resolve(src);
        self.store(dst, SymbolicValue::bin_op(op, lhs, rhs));
    }

    /// One-operand `mul`/`imul`: the operand width selects the accumulator
    /// pair, and both halves of the widened product are overwritten.
    fn widening_multiply(&mut self, inst: &Instruction) -> AnalysisResult<()> {
        let operand = &inst.operands[0];
        let width = self.operand_width(operand)?;
        let multiplier = self.resolve(operand);
        match width {
            // The 8-bit form widens only into the 16-bit accumulator.
            Width::W8 => {
                let acc = self.resolve("al");
                self.store("ax", SymbolicValue::bin_op(BinOpKind::Mul, acc, multiplier));
            }
            Width::W16 => self.store_widened("ax", "dx", "ax", Width::W16, multiplier),
            Width::W32 => self.store_widened("eax", "edx", "eax", Width::W32, multiplier),
            Width::W64 => self.store_widened("rax", "rdx", "rax", Width::W64, multiplier),
            // No accumulator pair exists for vector operands.
            Width::W128 => self.record_unmodeled(inst),
        }
        Ok(())
    }

    fn store_widened(
        &mut self,
        acc: &str,
        hi: &str,
        lo: &str,
        width: Width,
        multiplier: SymbolicValue,
    ) {
        let product = SymbolicValue::bin_op(BinOpKind::Mul, self.resolve(acc), multiplier);
        self.store(hi, SymbolicValue::half(HalfKind::High, width, product.clone()));
        self.store(lo, SymbolicValue::half(HalfKind::Low, width, product));
    }

    /// Two-operand `imul`: widths must match explicitly.
    fn checked_multiply(&mut self, inst: &Instruction) -> AnalysisResult<()> {
        let (dst, src) = (inst.operands[0].as_str(), inst.operands[1].as_str());
        let dst_width = self.operand_width(dst)?;
        let src_width = self.operand_width(src)?;
        if dst_width != src_width {
            return Err(AnalysisError::OperandWidthMismatch {
                dst: dst.to_string(),
                dst_bits: dst_width.bits(),
                src: src.to_string(),
                src_bits: src_width.bits(),
            });
        }
        self.accumulate(inst, BinOpKind::Mul);
        Ok(())
    }

    fn operand_width(&self, text: &str) -> AnalysisResult<Width> {
        stackray_core::operand_width(text)
            .ok_or_else(|| AnalysisError::UnknownOperandSize(text.to_string()))
    }

    fn record_unmodeled(&mut self, inst: &Instruction) {
        self.diagnostics.push(Diagnostic::UnmodeledOpcode {
            address: inst.address,
            mnemonic: inst.mnemonic.clone(),
        });
    }

    /// Current register state.
    pub fn registers(&self) -> &HashMap<String, SymbolicValue> {
        &self.registers
    }

    /// Current stack-frame state, keyed by raw memory-operand text.
    pub fn stack_frame(&self) -> &HashMap<String, SymbolicValue> {
        &self.stack_frame
    }

    /// Looks up a register's value, if one was ever written.
    pub fn register(&self, name: &str) -> Option<&SymbolicValue> {
        self.registers.get(name)
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

fn two_operands(inst: &Instruction) -> Option<(&str, &str)> {
    match inst.operands.as_slice() {
        [dst, src] => Some((dst.as_str(), src.as_str())),
        _ => None,
    }
}
