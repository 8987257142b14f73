//! Symbolic value expressions.
//!
//! A value records how a register's or stack slot's content was derived,
//! not what it concretely is. A location that was never written reads as a
//! [`SymbolicValue::Leaf`] of its own text; that identity value is how
//! unknown-origin contents surface as candidate parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

use stackray_core::Width;

/// Binary operator recorded in a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
}

impl BinOpKind {
    /// Returns the operator symbol used in rendered expressions.
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
        }
    }
}

/// Which half of a widening multiply result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfKind {
    High,
    Low,
}

/// A symbolic expression tree.
///
/// Renders to the flat derivation strings used in reports: a chain of
/// `add`/`sub` over identities prints as `eax+ebx-ecx`, a widening
/// multiply half as `HIDWORD(eax*esi)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicValue {
    /// An identity: the name or text of a location read before any write.
    Leaf(String),
    /// A binary derivation from two prior values.
    BinOp {
        op: BinOpKind,
        lhs: Box<SymbolicValue>,
        rhs: Box<SymbolicValue>,
    },
    /// One half of a widening multiply, tagged with the result width of
    /// that half (`HIWORD`/`LOWORD`, `HIDWORD`/`LODWORD`, ...).
    Half {
        half: HalfKind,
        width: Width,
        inner: Box<SymbolicValue>,
    },
}

impl SymbolicValue {
    /// Creates an identity value.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    /// Combines two values with a binary operator.
    pub fn bin_op(op: BinOpKind, lhs: SymbolicValue, rhs: SymbolicValue) -> Self {
        Self::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Wraps a product in a half-of-widening-multiply tag.
    pub fn half(half: HalfKind, width: Width, inner: SymbolicValue) -> Self {
        Self::Half {
            half,
            width,
            inner: Box::new(inner),
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(name) => f.write_str(name),
            Self::BinOp { op, lhs, rhs } => write!(f, "{lhs}{}{rhs}", op.symbol()),
            Self::Half { half, width, inner } => {
                let prefix = match half {
                    HalfKind::High => "HI",
                    HalfKind::Low => "LO",
                };
                let keyword = width
                    .keyword()
                    .map(|kw| kw.as_str())
                    .unwrap_or("UNKNOWN");
                write!(f, "{prefix}{keyword}({inner})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_renders_as_name() {
        assert_eq!(SymbolicValue::leaf("eax").to_string(), "eax");
        assert_eq!(
            SymbolicValue::leaf("DWORD PTR [rbp-0x4]").to_string(),
            "DWORD PTR [rbp-0x4]"
        );
    }

    #[test]
    fn test_chain_renders_left_to_right() {
        let v = SymbolicValue::bin_op(
            BinOpKind::Sub,
            SymbolicValue::bin_op(
                BinOpKind::Add,
                SymbolicValue::leaf("eax"),
                SymbolicValue::leaf("ebx"),
            ),
            SymbolicValue::leaf("ecx"),
        );
        assert_eq!(v.to_string(), "eax+ebx-ecx");
    }

    #[test]
    fn test_half_tags() {
        let product = SymbolicValue::bin_op(
            BinOpKind::Mul,
            SymbolicValue::leaf("eax"),
            SymbolicValue::leaf("esi"),
        );
        let hi = SymbolicValue::half(HalfKind::High, Width::W32, product.clone());
        let lo = SymbolicValue::half(HalfKind::Low, Width::W32, product);
        assert_eq!(hi.to_string(), "HIDWORD(eax*esi)");
        assert_eq!(lo.to_string(), "LODWORD(eax*esi)");

        let product = SymbolicValue::bin_op(
            BinOpKind::Mul,
            SymbolicValue::leaf("rax"),
            SymbolicValue::leaf("rsi"),
        );
        let hi = SymbolicValue::half(HalfKind::High, Width::W64, product);
        assert_eq!(hi.to_string(), "HIQWORD(rax*rsi)");
    }

    #[test]
    fn test_structural_equality() {
        let a = SymbolicValue::bin_op(
            BinOpKind::Add,
            SymbolicValue::leaf("eax"),
            SymbolicValue::leaf("ebx"),
        );
        let b = SymbolicValue::bin_op(
            BinOpKind::Add,
            SymbolicValue::leaf("eax"),
            SymbolicValue::leaf("ebx"),
        );
        assert_eq!(a, b);
    }
}
