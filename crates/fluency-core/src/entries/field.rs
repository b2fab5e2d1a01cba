//! Field entries.

use crate::{TypeRef, Visibility};

/// A declared instance field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Declared kind.
    pub ty: TypeRef,
    /// Field visibility.
    pub visibility: Visibility,
}

impl FieldEntry {
    /// Create a new field entry.
    pub fn new(name: impl Into<String>, ty: TypeRef, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility,
        }
    }

    /// Create a public field.
    pub fn public(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, ty, Visibility::Public)
    }

    /// Create a private field.
    pub fn private(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, ty, Visibility::Private)
    }
}
