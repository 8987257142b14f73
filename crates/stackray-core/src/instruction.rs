//! Textual instruction model and listing-line decoding.
//!
//! One listing line has the fixed envelope
//! `address : 1-7 hex byte pairs : mnemonic : operand[, operand] : [# hex address]`,
//! e.g. `  401143: 89 7d fc   mov DWORD PTR [rbp-0x4],edi` or
//! `  401151: e8 ca ff ff ff   call 0x401120 # 0x401120`.

use crate::error::DecodeError;

/// Instruction family, resolved once at decode time. The symbolic tracker
/// dispatches on this instead of re-inspecting mnemonic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstKind {
    /// Any `mov`-prefixed mnemonic: full overwrite of the destination.
    Move,
    /// `add`, `adc`, `adox`, `adcx`.
    Add,
    /// `sub`.
    Subtract,
    /// `mul`, `imul` (one- and two-operand forms).
    Multiply,
    /// Everything else; applying it leaves state untouched.
    Unmodeled,
}

impl InstKind {
    /// Classifies a lowercase mnemonic.
    pub fn classify(mnemonic: &str) -> Self {
        if mnemonic.starts_with("mov") {
            return Self::Move;
        }
        match mnemonic {
            "add" | "adc" | "adox" | "adcx" => Self::Add,
            "sub" => Self::Subtract,
            "mul" | "imul" => Self::Multiply,
            _ => Self::Unmodeled,
        }
    }
}

/// One decoded instruction. Created by [`Instruction::parse`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Virtual address of this instruction.
    pub address: u64,
    /// Lowercase mnemonic text.
    pub mnemonic: String,
    /// Up to two operand texts, trimmed, destination first.
    pub operands: Vec<String>,
    /// Target address from a trailing `# 0x...` annotation, if present.
    pub referenced_address: Option<u64>,
    /// Instruction family for tracker dispatch.
    pub kind: InstKind,
}

impl Instruction {
    /// Decodes one listing line.
    ///
    /// A failure covers this line only; callers that decode whole listings
    /// use [`parse_listing`] to skip bad lines and keep going.
    pub fn parse(line: &str) -> Result<Instruction, DecodeError> {
        let fail = |reason: &str| DecodeError::invalid_line(line, reason);

        let trimmed = line.trim();
        let (addr_text, rest) = trimmed
            .split_once(':')
            .ok_or_else(|| fail("missing address separator"))?;
        let addr_text = addr_text.trim();
        if addr_text.is_empty() || !addr_text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(fail("address is not hexadecimal"));
        }
        let address =
            u64::from_str_radix(addr_text, 16).map_err(|_| fail("address out of range"))?;

        // Byte field: 1-7 two-digit hex pairs.
        let mut cursor = rest;
        let mut byte_count = 0;
        while byte_count < 7 {
            let (token, after) = take_token(cursor);
            if token.len() == 2 && token.bytes().all(|b| b.is_ascii_hexdigit()) {
                byte_count += 1;
                cursor = after;
            } else {
                break;
            }
        }
        if byte_count == 0 {
            return Err(fail("missing instruction bytes"));
        }

        let (mnemonic, cursor) = take_token(cursor);
        if mnemonic.is_empty() {
            return Err(fail("missing mnemonic"));
        }

        // Optional trailing `# 0x...` annotation on calls and jumps.
        let (operand_text, referenced_address) = match cursor.find('#') {
            Some(at) => {
                let target = cursor[at + 1..].trim();
                let digits = target.strip_prefix("0x").unwrap_or(target);
                let target = u64::from_str_radix(digits, 16)
                    .map_err(|_| fail("invalid referenced address"))?;
                (&cursor[..at], Some(target))
            }
            None => (cursor, None),
        };

        let operand_text = operand_text.trim();
        let operands = if operand_text.is_empty() {
            Vec::new()
        } else {
            let parts: Vec<&str> = operand_text.split(',').collect();
            if parts.len() > 2 {
                return Err(fail("too many operands"));
            }
            if parts.iter().any(|p| p.trim().is_empty()) {
                return Err(fail("empty operand"));
            }
            parts.iter().map(|p| p.trim().to_string()).collect()
        };

        Ok(Instruction {
            address,
            kind: InstKind::classify(mnemonic),
            mnemonic: mnemonic.to_string(),
            operands,
            referenced_address,
        })
    }

    /// Destination operand text, when present.
    pub fn destination(&self) -> Option<&str> {
        self.operands.first().map(String::as_str)
    }

    /// Source operand text of a two-operand instruction.
    pub fn source(&self) -> Option<&str> {
        self.operands.get(1).map(String::as_str)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands.join(","))?;
        }
        Ok(())
    }
}

/// A listing line rejected by the decoder, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedLine {
    /// The rejected line, verbatim.
    pub line: String,
    /// Why the decoder rejected it.
    pub reason: String,
}

/// Decodes a newline-separated listing, skipping malformed lines.
///
/// One corrupted line (a data byte, a stray comment) never discards the
/// rest of the function: it lands in the skip list and decoding continues.
/// Blank lines are ignored outright.
pub fn parse_listing(content: &str) -> (Vec<Instruction>, Vec<SkippedLine>) {
    let mut instructions = Vec::new();
    let mut skipped = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match Instruction::parse(line) {
            Ok(inst) => instructions.push(inst),
            Err(DecodeError::InvalidInstructionLine { reason, .. }) => {
                skipped.push(SkippedLine {
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }
    (instructions, skipped)
}

fn take_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}
