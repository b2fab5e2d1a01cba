//! Type descriptors.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::{FieldEntry, MethodEntry};
use crate::TypeHash;

/// Whether a descriptor is a concrete class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

/// Runtime type descriptor.
///
/// Built once, then shared immutably through `Arc`. For interfaces
/// `interfaces` holds the extended super-interfaces.
#[derive(Clone)]
pub struct TypeEntry {
    /// Type name.
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Class or interface.
    pub kind: TypeKind,
    /// Base class (single inheritance).
    pub base: Option<Arc<TypeEntry>>,
    /// Implemented (or extended) interfaces, in declaration order.
    pub interfaces: Vec<Arc<TypeEntry>>,
    /// Declared methods, in declaration order.
    pub methods: Vec<MethodEntry>,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldEntry>,
    supertypes: FxHashSet<TypeHash>,
}

impl TypeEntry {
    /// Create an empty descriptor hashed from its name.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        Self {
            type_hash: TypeHash::from_name(&name),
            name,
            kind,
            base: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            supertypes: FxHashSet::default(),
        }
    }

    /// Set the base class.
    pub fn with_base(mut self, base: Arc<TypeEntry>) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn with_interface(mut self, interface: Arc<TypeEntry>) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    /// Compute the supertype set. Call once all parents are attached.
    pub fn finish(mut self) -> Self {
        let mut supertypes = FxHashSet::default();
        supertypes.insert(self.type_hash);
        if let Some(base) = &self.base {
            supertypes.extend(base.supertypes.iter().copied());
        }
        for interface in &self.interfaces {
            supertypes.extend(interface.supertypes.iter().copied());
        }
        self.supertypes = supertypes;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Whether `hash` is this type or one of its supertypes.
    pub fn is_subtype_of(&self, hash: TypeHash) -> bool {
        self.supertypes.contains(&hash)
    }

    /// This type and its supertypes.
    pub fn supertypes(&self) -> &FxHashSet<TypeHash> {
        &self.supertypes
    }

    /// This type followed by its base-class chain, most derived first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Fields of this type and its ancestors with their declaring type,
    /// most derived first.
    pub fn all_fields(&self) -> Vec<(&TypeEntry, &FieldEntry)> {
        self.ancestors()
            .flat_map(|ty| ty.fields.iter().map(move |field| (ty, field)))
            .collect()
    }

    /// Interfaces declared on this type or inherited from base classes,
    /// deduplicated, most derived first.
    pub fn all_interfaces(&self) -> Vec<Arc<TypeEntry>> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for ty in self.ancestors() {
            for interface in &ty.interfaces {
                if seen.insert(interface.type_hash) {
                    result.push(Arc::clone(interface));
                }
            }
        }
        result
    }

    /// Methods of an interface including those of its super-interfaces,
    /// excluding universal methods and duplicate signatures.
    pub fn contract_methods(&self) -> Vec<&MethodEntry> {
        let mut result: Vec<&MethodEntry> = Vec::new();
        self.collect_contract(&mut result);
        result
    }

    fn collect_contract<'a>(&'a self, out: &mut Vec<&'a MethodEntry>) {
        for method in &self.methods {
            if method.def.is_universal() {
                continue;
            }
            if !out.iter().any(|m| m.def.same_signature(&method.def)) {
                out.push(method);
            }
        }
        for parent in &self.interfaces {
            parent.collect_contract(out);
        }
    }

    /// Contract methods still lacking an implementation.
    pub fn abstract_methods(&self) -> Vec<&MethodEntry> {
        self.contract_methods()
            .into_iter()
            .filter(|m| !m.is_invocable())
            .collect()
    }

    /// The single abstract method of a shape, if it has exactly one.
    pub fn single_method(&self) -> Option<&MethodEntry> {
        match self.abstract_methods().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Most-derived implementation of a signature along the base-class chain,
    /// with the type declaring it.
    pub fn find_implementation(
        &self,
        name: &str,
        params: &[crate::TypeRef],
    ) -> Option<(&TypeEntry, &MethodEntry)> {
        self.ancestors()
            .flat_map(|ty| ty.methods.iter().map(move |m| (ty, m)))
            .find(|(_, m)| m.name() == name && m.params() == params && m.is_invocable())
    }

}

impl PartialEq for TypeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.type_hash == other.type_hash
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base", &self.base.as_ref().map(|b| b.name.as_str()))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            )
            .field("methods", &self.methods.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Iterator over a type and its base classes.
pub struct Ancestors<'a> {
    next: Option<&'a TypeEntry>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base.as_deref();
        Some(current)
    }
}
