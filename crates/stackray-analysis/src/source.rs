//! The disassembly collaborator seam.
//!
//! Binary loading and true disassembly live outside this crate. Whatever
//! produces the listing text implements [`FunctionSource`]; the analysis
//! makes a single blocking `function_info` call at construction time and
//! never sees the underlying file handle.

use std::collections::HashMap;

use crate::{AnalysisError, AnalysisResult};

/// Address, byte size, and raw listing text of one named function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    /// Virtual address of the function's first instruction.
    pub address: u64,
    /// Size of the function body in bytes.
    pub size: u64,
    /// Newline-separated listing lines.
    pub content: String,
}

/// Resolves function names to their disassembled text.
pub trait FunctionSource {
    /// Looks up a function by name.
    ///
    /// Fails with [`AnalysisError::MissingFunction`] when the name cannot
    /// be resolved; that failure surfaces before any analysis begins.
    fn function_info(&self, name: &str) -> AnalysisResult<FunctionInfo>;
}

/// An in-memory source, mapping names directly to listing text. Used by
/// tests and by callers that already hold disassembly output.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    functions: HashMap<String, FunctionInfo>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under `name`.
    pub fn insert(&mut self, name: impl Into<String>, info: FunctionInfo) {
        self.functions.insert(name.into(), info);
    }
}

impl FunctionSource for MemorySource {
    fn function_info(&self, name: &str) -> AnalysisResult<FunctionInfo> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| AnalysisError::MissingFunction(name.to_string()))
    }
}
