//! The per-function analysis facade.

use stackray_core::{parse_listing, Instruction};

use crate::frame::{build_parameters, Parameter};
use crate::prologue::prologue_boundary;
use crate::source::FunctionSource;
use crate::state::SymbolicState;
use crate::{AnalysisResult, Diagnostic};

/// One function under analysis: its instruction sequence, the symbolic
/// state after replaying the prologue, and the recovered parameter list.
///
/// Constructed by [`Function::load`]; [`Function::decompile`] populates the
/// parameters; the result is read-only afterwards. Each instance owns its
/// state exclusively, so analyses of different functions never interact.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    address: u64,
    size: u64,
    content: String,
    instructions: Vec<Instruction>,
    state: SymbolicState,
    parameters: Vec<Parameter>,
    diagnostics: Vec<Diagnostic>,
}

impl Function {
    /// Resolves `name` through the disassembly source and decodes its
    /// listing. Malformed lines are skipped into the diagnostics; a
    /// missing function fails here, before any analysis.
    pub fn load(source: &dyn FunctionSource, name: &str) -> AnalysisResult<Function> {
        let info = source.function_info(name)?;
        let (instructions, skipped) = parse_listing(&info.content);
        let diagnostics = skipped
            .into_iter()
            .map(|s| Diagnostic::SkippedLine {
                line: s.line,
                reason: s.reason,
            })
            .collect();
        Ok(Function {
            name: name.to_string(),
            address: info.address,
            size: info.size,
            content: info.content,
            instructions,
            state: SymbolicState::new(),
            parameters: Vec::new(),
            diagnostics,
        })
    }

    /// Runs the analysis: finds the prologue boundary, replays the
    /// tracker over the prologue range, and publishes the ordered
    /// parameter list.
    ///
    /// On error nothing is published: the parameter list stays empty and
    /// the pre-error state is discarded.
    pub fn decompile(&mut self) -> AnalysisResult<()> {
        let boundary = prologue_boundary(&self.instructions);
        let mut state = SymbolicState::new();
        for inst in &self.instructions[..boundary] {
            state.apply(inst)?;
        }
        let parameters = build_parameters(&state);
        self.diagnostics.extend(state.take_diagnostics());
        self.state = state;
        self.parameters = parameters;
        Ok(())
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Virtual address of the first instruction.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Function size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Raw listing text, as received from the source.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Decoded instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Symbolic state snapshot after [`Function::decompile`].
    pub fn state(&self) -> &SymbolicState {
        &self.state
    }

    /// Recovered parameters, in calling-convention order. Empty until
    /// [`Function::decompile`] succeeds.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Skipped lines and unmodeled opcodes observed so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Function name: {}", self.name)?;
        writeln!(f, "Function address: {:#x}", self.address)?;
        writeln!(f, "Function size: {}", self.size)?;
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        writeln!(f, "Function parameters: {}", params.join(","))?;
        write!(f, "Content:\n{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FunctionInfo, MemorySource};
    use crate::AnalysisError;

    const THREE_INT_ARGS: &str = "  401136: 55            push   rbp
  401137: 48 89 e5      mov    rbp,rsp
  40113a: 89 7d fc      mov    DWORD PTR [rbp-0x4],edi
  40113d: 89 75 f8      mov    DWORD PTR [rbp-0x8],esi
  401140: 89 55 f4      mov    DWORD PTR [rbp-0xc],edx
  401143: 8b 55 fc      mov    edx,DWORD PTR [rbp-0x4]
  401146: 8b 45 f8      mov    eax,DWORD PTR [rbp-0x8]
  401149: 01 d0         add    eax,edx
  40114b: 5d            pop    rbp
  40114c: c3            ret
";

    fn source_with(content: &str) -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(
            "f",
            FunctionInfo {
                address: 0x401136,
                size: 23,
                content: content.to_string(),
            },
        );
        source
    }

    #[test]
    fn test_decompile_recovers_spilled_arguments() {
        let source = source_with(THREE_INT_ARGS);
        let mut func = Function::load(&source, "f").unwrap();
        func.decompile().unwrap();

        // Spills at -0x4, -0x8, -0xc: magnitude ascending.
        let params: Vec<String> = func.parameters().iter().map(|p| p.slot.clone()).collect();
        assert_eq!(
            params,
            vec![
                "DWORD PTR [rbp-0x4]",
                "DWORD PTR [rbp-0x8]",
                "DWORD PTR [rbp-0xc]",
            ]
        );
        assert_eq!(
            func.state().stack_frame()["DWORD PTR [rbp-0x4]"].to_string(),
            "edi"
        );
    }

    #[test]
    fn test_prologue_excludes_body_slots() {
        let source = source_with(THREE_INT_ARGS);
        let mut func = Function::load(&source, "f").unwrap();
        func.decompile().unwrap();

        // The body's reads never ran through the tracker, so no extra
        // slots appear and the spilled values are untouched.
        assert_eq!(func.state().stack_frame().len(), 3);
        assert_eq!(func.state().register("eax"), None);
    }

    #[test]
    fn test_missing_function_before_analysis() {
        let source = MemorySource::new();
        assert_eq!(
            Function::load(&source, "absent").unwrap_err(),
            AnalysisError::MissingFunction("absent".to_string())
        );
    }

    #[test]
    fn test_malformed_lines_become_diagnostics() {
        let content = "\
corrupted
  40113a: 89 7d fc   mov DWORD PTR [rbp-0x4],edi
(bad data)
";
        let source = source_with(content);
        let func = Function::load(&source, "f").unwrap();
        assert_eq!(func.instructions().len(), 1);
        assert_eq!(func.diagnostics().len(), 2);
        assert!(matches!(
            func.diagnostics()[0],
            Diagnostic::SkippedLine { .. }
        ));
    }

    #[test]
    fn test_failed_decompile_publishes_nothing() {
        // Width-mismatched imul in the prologue range is fatal.
        let content = "\
  401136: 48 0f af c3   imul rax,ebx
  40113a: 89 7d fc      mov  DWORD PTR [rbp-0x4],edi
";
        let source = source_with(content);
        let mut func = Function::load(&source, "f").unwrap();
        let err = func.decompile().unwrap_err();
        assert!(matches!(err, AnalysisError::OperandWidthMismatch { .. }));
        assert!(func.parameters().is_empty());
    }

    #[test]
    fn test_display_report() {
        let source = source_with(THREE_INT_ARGS);
        let mut func = Function::load(&source, "f").unwrap();
        func.decompile().unwrap();

        let report = func.to_string();
        assert!(report.starts_with("Function name: f\n"));
        assert!(report.contains("Function address: 0x401136\n"));
        assert!(report.contains("Function size: 23\n"));
        assert!(report.contains("Function parameters: DWORD,DWORD,DWORD\n"));
        assert!(report.contains("Content:\n  401136:"));
    }
}
