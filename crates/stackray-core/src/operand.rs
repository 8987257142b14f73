//! Operand text classification.
//!
//! Operands stay as raw text on the instruction; this module derives a
//! structured view on demand: register, frame memory reference, or literal.

use std::str::FromStr;

use crate::register::{is_register, Width};

/// Memory size keyword as it appears in listing text (`DWORD PTR [...]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeKeyword {
    Byte,
    Word,
    Dword,
    Qword,
}

impl SizeKeyword {
    /// Returns the operand width this keyword denotes.
    pub fn width(&self) -> Width {
        match self {
            Self::Byte => Width::W8,
            Self::Word => Width::W16,
            Self::Dword => Width::W32,
            Self::Qword => Width::W64,
        }
    }

    /// Returns the keyword as listing text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::Word => "WORD",
            Self::Dword => "DWORD",
            Self::Qword => "QWORD",
        }
    }
}

impl FromStr for SizeKeyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BYTE" => Ok(Self::Byte),
            "WORD" => Ok(Self::Word),
            "DWORD" => Ok(Self::Dword),
            "QWORD" => Ok(Self::Qword),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SizeKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frame memory reference: `base ± displacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRef {
    /// Leading size keyword, if the operand text carries one.
    pub size: Option<SizeKeyword>,
    /// Base register name inside the brackets.
    pub base: String,
    /// Signed displacement from the base.
    pub displacement: i64,
}

/// Derived classification of one operand's text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandRef {
    /// A known register name.
    Register(String),
    /// A `[base ± disp]` memory reference, with optional size keyword.
    Memory(MemoryRef),
    /// Anything else: immediates, symbols, unhandled addressing forms.
    Literal(String),
}

impl OperandRef {
    /// Classifies operand text.
    ///
    /// Bracketed operands that do not match the simple `base ± 0xHEX`
    /// shape (SIB addressing, rip-relative globals) classify as `Literal`;
    /// the analysis does not model them.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if is_register(text) {
            return Self::Register(text.to_string());
        }
        match parse_memory(text) {
            Some(mem) => Self::Memory(mem),
            None => Self::Literal(text.to_string()),
        }
    }

    /// Returns the memory reference if this is a memory operand.
    pub fn as_memory(&self) -> Option<&MemoryRef> {
        match self {
            Self::Memory(mem) => Some(mem),
            _ => None,
        }
    }
}

fn parse_memory(text: &str) -> Option<MemoryRef> {
    let open = text.find('[')?;
    let close = text.rfind(']')?;
    if close <= open {
        return None;
    }

    let prefix = text[..open].trim();
    let size = match prefix.split_whitespace().next() {
        Some(keyword) => Some(keyword.parse::<SizeKeyword>().ok()?),
        None => None,
    };

    let body = &text[open + 1..close];
    let (base, displacement) = match body.find(|c| c == '+' || c == '-') {
        Some(sign_at) => {
            let base = &body[..sign_at];
            let negative = body.as_bytes()[sign_at] == b'-';
            let digits = body[sign_at + 1..].trim().strip_prefix("0x")?;
            let magnitude = i64::from_str_radix(digits, 16).ok()?;
            (base, if negative { -magnitude } else { magnitude })
        }
        None => (body, 0),
    };

    let base = base.trim();
    if !is_register(base) {
        return None;
    }

    Some(MemoryRef {
        size,
        base: base.to_string(),
        displacement,
    })
}
