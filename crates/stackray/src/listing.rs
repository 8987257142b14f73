//! Disassembly listing files.
//!
//! Stands in for a real binary loader: reads objdump-style text where each
//! function starts with a `address <name>:` header and is followed by its
//! instruction lines. Function sizes are recovered from the byte pairs on
//! each line, so no binary parsing is needed.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use stackray_analysis::{AnalysisError, AnalysisResult, FunctionInfo, FunctionSource};

/// A parsed listing file, resolving function names to their text.
#[derive(Debug, Clone, Default)]
pub struct ListingFile {
    functions: HashMap<String, FunctionInfo>,
}

impl ListingFile {
    /// Reads and parses a listing file.
    pub fn open(path: &Path) -> io::Result<ListingFile> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Parses listing text. Lines before the first function header are
    /// ignored; every non-blank line after a header belongs to that
    /// function until the next header.
    pub fn parse(text: &str) -> ListingFile {
        let mut functions = HashMap::new();
        let mut current: Option<(String, FunctionInfo)> = None;

        for line in text.lines() {
            if let Some((name, address)) = parse_header(line) {
                if let Some((done_name, info)) = current.take() {
                    functions.insert(done_name, info);
                }
                current = Some((
                    name,
                    FunctionInfo {
                        address,
                        size: 0,
                        content: String::new(),
                    },
                ));
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            if let Some((_, info)) = current.as_mut() {
                info.size += instruction_bytes(line);
                info.content.push_str(line);
                info.content.push('\n');
            }
        }
        if let Some((name, info)) = current {
            functions.insert(name, info);
        }

        ListingFile { functions }
    }

    /// Number of functions in the listing.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no function headers were found.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionSource for ListingFile {
    fn function_info(&self, name: &str) -> AnalysisResult<FunctionInfo> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| AnalysisError::MissingFunction(name.to_string()))
    }
}

/// Matches a `0000000000401136 <four_chars_int>:` header.
fn parse_header(line: &str) -> Option<(String, u64)> {
    let mut tokens = line.trim().split_whitespace();
    let addr_text = tokens.next()?;
    let name_text = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    let address = u64::from_str_radix(addr_text, 16).ok()?;
    let name = name_text
        .strip_prefix('<')?
        .strip_suffix(">:")?
        .to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, address))
}

/// Counts the hex byte pairs on an instruction line; zero for lines that
/// do not follow the envelope.
fn instruction_bytes(line: &str) -> u64 {
    let Some((_, rest)) = line.split_once(':') else {
        return 0;
    };
    rest.split_whitespace()
        .take_while(|tok| tok.len() == 2 && tok.bytes().all(|b| b.is_ascii_hexdigit()))
        .take(7)
        .count() as u64
}
