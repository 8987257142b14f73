//! x86-64 register catalog.
//!
//! Built once on first use from the register family structure: the eight
//! legacy general-purpose families at four widths (`rax`/`eax`/`ax`/`al`),
//! the eight extended registers `r8`-`r15` with their `d`/`w`/`b` forms,
//! and the sixteen `xmm` vector registers.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::operand::SizeKeyword;

/// Storage width of a register or memory operand, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl Width {
    /// Returns the width in bits.
    pub fn bits(&self) -> u16 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
            Self::W128 => 128,
        }
    }

    /// Returns the memory size keyword naming this width, if one exists.
    /// 128-bit operands have no keyword in the listing grammar.
    pub fn keyword(&self) -> Option<SizeKeyword> {
        match self {
            Self::W8 => Some(SizeKeyword::Byte),
            Self::W16 => Some(SizeKeyword::Word),
            Self::W32 => Some(SizeKeyword::Dword),
            Self::W64 => Some(SizeKeyword::Qword),
            Self::W128 => None,
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

fn catalog() -> &'static HashMap<String, Width> {
    static CATALOG: OnceLock<HashMap<String, Width>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut map = HashMap::new();

        // Legacy families: rax/eax/ax/al, rsi/esi/si/sil, ...
        for family in ["ax", "bx", "cx", "dx", "si", "di", "sp", "bp"] {
            map.insert(format!("r{family}"), Width::W64);
            map.insert(format!("e{family}"), Width::W32);
            map.insert(family.to_string(), Width::W16);
            let low = if family.contains('x') {
                family.replace('x', "l")
            } else {
                format!("{family}l")
            };
            map.insert(low, Width::W8);
        }

        // Extended registers: r8..r15 plus d/w/b forms.
        for i in 8..16 {
            map.insert(format!("r{i}"), Width::W64);
            map.insert(format!("r{i}d"), Width::W32);
            map.insert(format!("r{i}w"), Width::W16);
            map.insert(format!("r{i}b"), Width::W8);
        }

        // Vector registers.
        for i in 0..16 {
            map.insert(format!("xmm{i}"), Width::W128);
        }

        map
    })
}

/// Returns true if `name` is a known register name.
pub fn is_register(name: &str) -> bool {
    catalog().contains_key(name)
}

/// Returns the width of a register, or `None` for unknown names.
pub fn register_width(name: &str) -> Option<Width> {
    catalog().get(name).copied()
}

/// Returns the width of an operand: a register's catalog width, or the
/// width named by a leading size keyword on memory-operand text
/// (`DWORD PTR [rbp-0x4]`). `None` when neither applies.
pub fn operand_width(text: &str) -> Option<Width> {
    if let Some(width) = register_width(text) {
        return Some(width);
    }
    let keyword = text.split_whitespace().next()?;
    keyword.parse::<SizeKeyword>().ok().map(|kw| kw.width())
}
