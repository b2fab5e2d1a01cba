//! TypeRegistry - name and hash indexed store of type descriptors.
//!
//! # Storage Model
//!
//! - **Types**: `Arc<TypeEntry>` stored by name, with a reverse index by `TypeHash`
//! - Descriptors are immutable once registered; builders produce them complete
//!
//! # Example
//!
//! ```
//! use fluency_core::{CallContext, PrimitiveKind, TypeRef};
//! use fluency_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::with_builtins();
//! let int = TypeRef::boxed(PrimitiveKind::Int32);
//!
//! registry
//!     .register_class("Counter")
//!     .method("inc", vec![int.clone()], int, |ctx: &mut CallContext| {
//!         let i: i32 = ctx.arg(0)?;
//!         ctx.set_return(i + 1);
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.contains_type("Counter"));
//! ```

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use fluency_core::{ObjectRef, RegistrationError, TypeEntry, TypeHash, TypeRef, builtins};

use crate::{ClassBuilder, InterfaceBuilder};

/// Store of type descriptors.
///
/// Populated during setup, then effectively read-only. Values created from
/// registered types hold their descriptor directly, so dispatch never needs
/// the registry.
#[derive(Default)]
pub struct TypeRegistry {
    /// Types stored by name (PRIMARY storage).
    types: FxHashMap<String, Arc<TypeEntry>>,

    /// Reverse index: hash -> name.
    type_hash_to_name: FxHashMap<TypeHash, String>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all builtin types pre-registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for entry in builtins::all() {
            registry.insert(entry);
        }
        registry
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type by name.
    pub fn get_type(&self, name: &str) -> Option<&Arc<TypeEntry>> {
        self.types.get(name)
    }

    /// Get a type by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&Arc<TypeEntry>> {
        self.type_hash_to_name
            .get(&hash)
            .and_then(|name| self.types.get(name))
    }

    /// Get a type by name or fail with `TypeNotFound`.
    pub fn require(&self, name: &str) -> Result<&Arc<TypeEntry>, RegistrationError> {
        self.get_type(name)
            .ok_or_else(|| RegistrationError::TypeNotFound(name.to_string()))
    }

    /// Check if a type exists by name.
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Declared kind naming a registered type.
    pub fn named(&self, name: &str) -> Result<TypeRef, RegistrationError> {
        let entry = self.require(name)?;
        Ok(TypeRef::Named {
            hash: entry.type_hash,
            name: entry.name.clone(),
        })
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered types, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeEntry>> {
        self.types.values()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Start registering a class.
    pub fn register_class(&mut self, name: impl Into<String>) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name.into())
    }

    /// Start registering an interface.
    pub fn register_interface(&mut self, name: impl Into<String>) -> InterfaceBuilder<'_> {
        InterfaceBuilder::new(self, name.into())
    }

    /// Register a complete descriptor.
    pub fn register(&mut self, entry: TypeEntry) -> Result<Arc<TypeEntry>, RegistrationError> {
        if self.types.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateType(entry.name));
        }
        let entry = Arc::new(entry.finish());
        debug!(
            name = %entry.name,
            kind = ?entry.kind,
            methods = entry.methods.len(),
            fields = entry.fields.len(),
            "registered type"
        );
        self.insert(Arc::clone(&entry));
        Ok(entry)
    }

    fn insert(&mut self, entry: Arc<TypeEntry>) {
        self.type_hash_to_name
            .insert(entry.type_hash, entry.name.clone());
        self.types.insert(entry.name.clone(), entry);
    }

    // ==========================================================================
    // Instantiation
    // ==========================================================================

    /// Create an instance of a registered class with all fields `Null`.
    pub fn instantiate(&self, name: &str) -> Result<ObjectRef, RegistrationError> {
        let entry = self.require_class(name)?;
        Ok(ObjectRef::new(Arc::clone(entry)))
    }

    /// Create an instance of a registered class carrying a native payload.
    pub fn instantiate_with<T: Any>(
        &self,
        name: &str,
        native: T,
    ) -> Result<ObjectRef, RegistrationError> {
        let entry = self.require_class(name)?;
        Ok(ObjectRef::with_native(Arc::clone(entry), native))
    }

    fn require_class(&self, name: &str) -> Result<&Arc<TypeEntry>, RegistrationError> {
        let entry = self.require(name)?;
        if !entry.is_class() {
            return Err(RegistrationError::NotAClass(name.to_string()));
        }
        Ok(entry)
    }
}
