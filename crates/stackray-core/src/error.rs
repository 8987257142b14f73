//! Decode error types.

use thiserror::Error;

/// Error type for instruction-line decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The line does not match the listing envelope
    /// `address : byte pairs : mnemonic : operands : [# address]`.
    #[error("invalid instruction line {line:?}: {reason}")]
    InvalidInstructionLine { line: String, reason: String },
}

impl DecodeError {
    /// Creates a new InvalidInstructionLine error.
    pub fn invalid_line(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstructionLine {
            line: line.into(),
            reason: reason.into(),
        }
    }
}
