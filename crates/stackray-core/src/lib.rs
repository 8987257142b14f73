//! # stackray-core
//!
//! Core types for the stackray parameter-recovery tool. This crate defines
//! the textual instruction model, operand classification, and the x86-64
//! register catalog shared by the analysis crate and the CLI.

pub mod error;
pub mod instruction;
pub mod operand;
pub mod register;

pub use error::DecodeError;
pub use instruction::{parse_listing, InstKind, Instruction, SkippedLine};
pub use operand::{MemoryRef, OperandRef, SizeKeyword};
pub use register::{is_register, operand_width, register_width, Width};
