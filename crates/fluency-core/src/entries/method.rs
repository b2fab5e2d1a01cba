//! Method definitions and entries.

use std::fmt;

use bitflags::bitflags;

use crate::{NativeFn, TypeHash, TypeRef, Visibility};

bitflags! {
    /// Flags describing how a method is called.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        /// The last parameter collects any number of trailing arguments.
        const VARIADIC = 1 << 0;
        /// Declared without an implementation (interface methods).
        const ABSTRACT = 1 << 1;
    }
}

/// The universal base-contract methods every type answers, as `(name, arity)`.
pub const UNIVERSAL_METHODS: [(&str, usize); 3] = [("equals", 1), ("hash_code", 0), ("to_string", 0)];

/// Signature of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    /// Method name.
    pub name: String,
    /// Declared parameter kinds, in order. A variadic method's last parameter
    /// is an array of the element kind.
    pub params: Vec<TypeRef>,
    /// Declared return kind.
    pub return_type: TypeRef,
    /// Method visibility.
    pub visibility: Visibility,
    /// Call flags.
    pub flags: MethodFlags,
}

impl MethodDef {
    /// Create a public, fixed-arity definition.
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            visibility: Visibility::Public,
            flags: MethodFlags::empty(),
        }
    }

    /// Set the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the definition variadic.
    pub fn variadic(mut self) -> Self {
        self.flags |= MethodFlags::VARIADIC;
        self
    }

    /// Mark the definition abstract.
    pub fn abstract_method(mut self) -> Self {
        self.flags |= MethodFlags::ABSTRACT;
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.flags.contains(MethodFlags::VARIADIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodFlags::ABSTRACT)
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Element kind of the variadic tail.
    pub fn variadic_element(&self) -> Option<&TypeRef> {
        if !self.is_variadic() {
            return None;
        }
        self.params.last().and_then(TypeRef::element)
    }

    /// Whether this is one of the universal base-contract methods.
    pub fn is_universal(&self) -> bool {
        UNIVERSAL_METHODS
            .iter()
            .any(|(name, arity)| *name == self.name && *arity == self.params.len())
    }

    /// Signature hash of name and parameter kinds. Independent of the owner.
    pub fn signature_hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(TypeRef::type_hash).collect();
        TypeHash::from_signature(&self.name, &params)
    }

    /// Whether `other` has the same name and parameter list.
    pub fn same_signature(&self, other: &MethodDef) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match (self.is_variadic() && i == last, param.element()) {
                (true, Some(element)) => write!(f, "{element}...")?,
                _ => write!(f, "{param}")?,
            }
        }
        write!(f, ")")
    }
}

/// A method of a type: its definition and, unless abstract, its native handle.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub def: MethodDef,
    pub native: Option<NativeFn>,
}

impl MethodEntry {
    /// Create an implemented method.
    pub fn new(def: MethodDef, native: NativeFn) -> Self {
        Self {
            def,
            native: Some(native),
        }
    }

    /// Create an abstract method without implementation.
    pub fn abstract_entry(def: MethodDef) -> Self {
        Self {
            def: def.abstract_method(),
            native: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.def.params
    }

    pub fn visibility(&self) -> Visibility {
        self.def.visibility
    }

    pub fn is_variadic(&self) -> bool {
        self.def.is_variadic()
    }

    /// Whether the method can be called.
    pub fn is_invocable(&self) -> bool {
        self.native.is_some() && !self.def.is_abstract()
    }
}
