//! Declared kinds for parameters, return values and array elements.

use std::fmt;

use crate::{PrimitiveKind, TypeHash};

/// A declared kind.
///
/// This is what a method signature says it expects. Runtime values are
/// checked against it by the dispatcher's compatibility rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (return types only).
    Void,
    /// The universal base type. Accepts every non-null value.
    Any,
    /// A primitive scalar (`int`).
    Primitive(PrimitiveKind),
    /// A boxed scalar (`Integer`).
    Boxed(PrimitiveKind),
    /// A string.
    String,
    /// A registered class or interface.
    Named { hash: TypeHash, name: String },
    /// An array of the given element kind.
    Array(Box<TypeRef>),
    /// Anything satisfying the callable contract.
    Callable,
    /// Anything satisfying the predicate contract.
    Predicate,
}

impl TypeRef {
    /// A primitive kind.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }

    /// A boxed kind.
    pub fn boxed(kind: PrimitiveKind) -> Self {
        TypeRef::Boxed(kind)
    }

    /// A named class or interface, hashed from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        TypeRef::Named {
            hash: TypeHash::from_name(&name),
            name,
        }
    }

    /// An array of `element`.
    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Element kind if this is an array.
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is an array kind.
    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    /// The primitive kind behind a primitive or boxed declaration.
    pub fn scalar_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) | TypeRef::Boxed(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Human-readable name (`Integer[]`).
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Identity hash of this kind.
    ///
    /// Primitive and boxed declarations of the same kind hash differently;
    /// the hash identifies the declaration, not its compatibility class.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeRef::Named { hash, .. } => *hash,
            TypeRef::Array(element) => TypeHash::from_array(element.type_hash()),
            other => TypeHash::from_name(&other.to_string()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Any => write!(f, "Object"),
            TypeRef::Primitive(kind) => write!(f, "{}", kind.name()),
            TypeRef::Boxed(kind) => write!(f, "{}", kind.boxed_name()),
            TypeRef::String => write!(f, "String"),
            TypeRef::Named { name, .. } => write!(f, "{name}"),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Callable => write!(f, "Callable"),
            TypeRef::Predicate => write!(f, "Predicate"),
        }
    }
}
