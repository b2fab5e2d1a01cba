//! Primitive kinds and their boxed counterparts.

use std::fmt;

/// Primitive scalar kinds.
///
/// Each primitive has a boxed counterpart (`Int32` ↔ `Integer`). Runtime
/// scalar values always report the boxed kind; declared parameters may name
/// either and both accept the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
}

/// Primitive ↔ boxed correspondence, as `(kind, primitive name, boxed name)`.
pub const BOXED: [(PrimitiveKind, &str, &str); 8] = [
    (PrimitiveKind::Bool, "boolean", "Boolean"),
    (PrimitiveKind::Char, "char", "Character"),
    (PrimitiveKind::Int8, "byte", "Byte"),
    (PrimitiveKind::Int16, "short", "Short"),
    (PrimitiveKind::Int32, "int", "Integer"),
    (PrimitiveKind::Int64, "long", "Long"),
    (PrimitiveKind::Float, "float", "Float"),
    (PrimitiveKind::Double, "double", "Double"),
];

impl PrimitiveKind {
    /// All primitive kinds, in table order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    const fn index(self) -> usize {
        match self {
            PrimitiveKind::Bool => 0,
            PrimitiveKind::Char => 1,
            PrimitiveKind::Int8 => 2,
            PrimitiveKind::Int16 => 3,
            PrimitiveKind::Int32 => 4,
            PrimitiveKind::Int64 => 5,
            PrimitiveKind::Float => 6,
            PrimitiveKind::Double => 7,
        }
    }

    /// Name of the primitive (`int`).
    pub const fn name(self) -> &'static str {
        BOXED[self.index()].1
    }

    /// Name of the boxed counterpart (`Integer`).
    pub const fn boxed_name(self) -> &'static str {
        BOXED[self.index()].2
    }

    /// Look up a kind by either its primitive or boxed name.
    pub fn from_name(name: &str) -> Option<Self> {
        BOXED
            .iter()
            .find(|(_, primitive, boxed)| *primitive == name || *boxed == name)
            .map(|(kind, _, _)| *kind)
    }

    /// Whether this is one of the integral kinds.
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8 | PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
