//! # stackray-analysis
//!
//! Stack-parameter recovery from disassembled instruction text.
//!
//! This crate provides:
//! - Symbolic value expressions tracking how register and stack-slot
//!   contents were derived
//! - A forward data-flow tracker with per-family transfer functions
//! - Prologue/body boundary detection
//! - ABI-order stack frame layout and parameter emission
//! - The [`Function`] facade tying the pieces together
//!
//! # Example
//!
//! ```ignore
//! use stackray_analysis::{Function, MemorySource};
//!
//! let mut func = Function::load(&source, "four_chars_int")?;
//! func.decompile()?;
//! for param in func.parameters() {
//!     println!("{param}");
//! }
//! ```

pub mod frame;
pub mod function;
pub mod prologue;
pub mod source;
pub mod state;
pub mod value;

pub use frame::{build_parameters, sorted_stack_frame, Parameter};
pub use function::Function;
pub use prologue::{prologue_boundary, FRAME_BASE};
pub use source::{FunctionInfo, FunctionSource, MemorySource};
pub use state::SymbolicState;
pub use value::{BinOpKind, HalfKind, SymbolicValue};

use thiserror::Error;

/// Errors that abort analysis of a single function.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Operand is neither a known register nor sized memory text.
    #[error("unknown operand size: {0:?}")]
    UnknownOperandSize(String),

    /// Two-operand multiply with mismatched explicit widths.
    #[error("operand width mismatch: {dst:?} is {dst_bits} bits, {src:?} is {src_bits} bits")]
    OperandWidthMismatch {
        dst: String,
        dst_bits: u16,
        src: String,
        src_bits: u16,
    },

    /// The disassembly source cannot resolve the requested name.
    #[error("function {0:?} not found")]
    MissingFunction(String),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A non-fatal observation recorded during analysis. Kept on the
/// [`Function`] so a surprising parameter list can be traced back to the
/// lines or opcodes the analysis could not model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A listing line the decoder rejected and skipped.
    SkippedLine { line: String, reason: String },
    /// An instruction whose opcode has no transfer function; state was
    /// left untouched.
    UnmodeledOpcode { address: u64, mnemonic: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedLine { line, reason } => {
                write!(f, "skipped line {line:?}: {reason}")
            }
            Self::UnmodeledOpcode { address, mnemonic } => {
                write!(f, "unmodeled opcode {mnemonic:?} at {address:#x}")
            }
        }
    }
}
