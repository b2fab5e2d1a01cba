//! Fluent builders for registering classes and interfaces.
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
//!     .register_interface("Runnable")
//!     .method("run", vec![], TypeRef::Void)
//!     .build()
//!     .unwrap();
//!
//! registry
//!     .register_class("Task")
//!     .implements("Runnable")
//!     .field("runs", int.clone())
//!     .method("run", vec![], TypeRef::Void, |_: &mut CallContext| Ok(()))
//!     .variadic_method(
//!         "sum",
//!         vec![int.clone(), TypeRef::array_of(int.clone())],
//!         int,
//!         |_ctx: &mut CallContext| Ok(()),
//!     )
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

use fluency_core::{
    CallContext, FieldEntry, MethodDef, MethodEntry, NativeError, NativeFn, RegistrationError,
    TypeEntry, TypeKind, TypeRef, Visibility, builtins,
};

use crate::TypeRegistry;

/// Builder for a class descriptor.
///
/// Created by [`TypeRegistry::register_class`]. Classes extend `Object`
/// unless [`extends`](ClassBuilder::extends) names another class.
pub struct ClassBuilder<'r> {
    registry: &'r mut TypeRegistry,
    name: String,
    base: Option<String>,
    interfaces: Vec<String>,
    methods: Vec<(MethodDef, Option<NativeFn>)>,
    fields: Vec<FieldEntry>,
}

impl<'r> ClassBuilder<'r> {
    pub(crate) fn new(registry: &'r mut TypeRegistry, name: String) -> Self {
        Self {
            registry,
            name,
            base: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    // === Hierarchy ===

    /// Set the base class.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add an implemented interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    // === Methods ===

    /// Add a public method.
    pub fn method<F>(self, name: &str, params: Vec<TypeRef>, return_type: TypeRef, f: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        self.method_def(MethodDef::new(name, params, return_type), Some(NativeFn::new(f)))
    }

    /// Add a private method.
    pub fn private_method<F>(
        self,
        name: &str,
        params: Vec<TypeRef>,
        return_type: TypeRef,
        f: F,
    ) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        let def = MethodDef::new(name, params, return_type).with_visibility(Visibility::Private);
        self.method_def(def, Some(NativeFn::new(f)))
    }

    /// Add a protected method.
    pub fn protected_method<F>(
        self,
        name: &str,
        params: Vec<TypeRef>,
        return_type: TypeRef,
        f: F,
    ) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        let def = MethodDef::new(name, params, return_type).with_visibility(Visibility::Protected);
        self.method_def(def, Some(NativeFn::new(f)))
    }

    /// Add a public variadic method. The last parameter must be an array of
    /// the element kind collected from trailing arguments.
    pub fn variadic_method<F>(
        self,
        name: &str,
        params: Vec<TypeRef>,
        return_type: TypeRef,
        f: F,
    ) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        let def = MethodDef::new(name, params, return_type).variadic();
        self.method_def(def, Some(NativeFn::new(f)))
    }

    /// Declare a method without implementation.
    pub fn abstract_method(self, name: &str, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        let def = MethodDef::new(name, params, return_type).abstract_method();
        self.method_def(def, None)
    }

    /// Add a method from a full definition.
    pub fn method_def(mut self, def: MethodDef, native: Option<NativeFn>) -> Self {
        self.methods.push((def, native));
        self
    }

    // === Fields ===

    /// Add a public field.
    pub fn field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields.push(FieldEntry::public(name, ty));
        self
    }

    /// Add a private field.
    pub fn private_field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields.push(FieldEntry::private(name, ty));
        self
    }

    /// Add a field with explicit visibility.
    pub fn field_with(mut self, name: &str, ty: TypeRef, visibility: Visibility) -> Self {
        self.fields.push(FieldEntry::new(name, ty, visibility));
        self
    }

    // === Build ===

    /// Validate and register the class.
    pub fn build(self) -> Result<Arc<TypeEntry>, RegistrationError> {
        let ClassBuilder {
            registry,
            name,
            base,
            interfaces,
            methods,
            fields,
        } = self;

        let base = match base {
            Some(base_name) => {
                let base = registry.require(&base_name)?;
                if !base.is_class() {
                    return Err(RegistrationError::NotAClass(base_name));
                }
                Arc::clone(base)
            }
            None => builtins::object(),
        };

        let mut entry = TypeEntry::new(name.as_str(), TypeKind::Class).with_base(base);
        entry.interfaces = resolve_interfaces(registry, &interfaces)?;
        entry.fields = fields;
        for (def, native) in methods {
            validate_variadic(&name, &def)?;
            let method = match native {
                Some(native) => MethodEntry::new(def, native),
                None if def.is_abstract() => MethodEntry::abstract_entry(def),
                None => {
                    return Err(RegistrationError::MissingImplementation {
                        type_name: name,
                        method: def.name,
                    });
                }
            };
            entry.methods.push(method);
        }

        registry.register(entry)
    }
}

/// Builder for an interface descriptor.
///
/// Created by [`TypeRegistry::register_interface`]. Every method is abstract.
pub struct InterfaceBuilder<'r> {
    registry: &'r mut TypeRegistry,
    name: String,
    extends: Vec<String>,
    methods: Vec<MethodDef>,
}

impl<'r> InterfaceBuilder<'r> {
    pub(crate) fn new(registry: &'r mut TypeRegistry, name: String) -> Self {
        Self {
            registry,
            name,
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Extend another interface.
    pub fn extends(mut self, interface: impl Into<String>) -> Self {
        self.extends.push(interface.into());
        self
    }

    /// Declare a method.
    pub fn method(mut self, name: &str, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        self.methods.push(MethodDef::new(name, params, return_type));
        self
    }

    /// Declare a variadic method.
    pub fn variadic_method(mut self, name: &str, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        self.methods
            .push(MethodDef::new(name, params, return_type).variadic());
        self
    }

    /// Validate and register the interface.
    pub fn build(self) -> Result<Arc<TypeEntry>, RegistrationError> {
        let InterfaceBuilder {
            registry,
            name,
            extends,
            methods,
        } = self;

        let mut entry = TypeEntry::new(name.as_str(), TypeKind::Interface);
        entry.interfaces = resolve_interfaces(registry, &extends)?;
        for def in methods {
            validate_variadic(&name, &def)?;
            entry.methods.push(MethodEntry::abstract_entry(def));
        }

        registry.register(entry)
    }
}

fn resolve_interfaces(
    registry: &TypeRegistry,
    names: &[String],
) -> Result<Vec<Arc<TypeEntry>>, RegistrationError> {
    names
        .iter()
        .map(|name| {
            let interface = registry.require(name)?;
            if !interface.is_interface() {
                return Err(RegistrationError::NotAnInterface(name.clone()));
            }
            Ok(Arc::clone(interface))
        })
        .collect()
}

fn validate_variadic(type_name: &str, def: &MethodDef) -> Result<(), RegistrationError> {
    if def.is_variadic() && def.variadic_element().is_none() {
        return Err(RegistrationError::InvalidVariadic {
            type_name: type_name.to_string(),
            method: def.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluency_core::{PrimitiveKind, TypeHash};

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn noop(_: &mut CallContext) -> Result<(), NativeError> {
        Ok(())
    }

    #[test]
    fn class_extends_object_by_default() {
        let mut registry = TypeRegistry::with_builtins();
        let entry = registry.register_class("Plain").build().unwrap();
        assert_eq!(entry.base.as_ref().map(|b| b.name.as_str()), Some("Object"));
        assert!(entry.is_subtype_of(TypeHash::from_name("Object")));
    }

    #[test]
    fn class_hierarchy_and_interfaces() {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_interface("Runnable")
            .method("run", vec![], TypeRef::Void)
            .build()
            .unwrap();
        registry
            .register_class("Base")
            .implements("Runnable")
            .method("run", vec![], TypeRef::Void, noop)
            .build()
            .unwrap();
        let derived = registry.register_class("Derived").extends("Base").build().unwrap();
        assert!(derived.is_subtype_of(TypeHash::from_name("Runnable")));
        assert!(derived.is_subtype_of(TypeHash::from_name("Base")));
    }

    #[test]
    fn interface_methods_are_abstract() {
        let mut registry = TypeRegistry::with_builtins();
        let runnable = registry
            .register_interface("Runnable")
            .method("run", vec![], TypeRef::Void)
            .build()
            .unwrap();
        assert!(runnable.is_interface());
        assert!(runnable.methods[0].def.is_abstract());
        assert!(!runnable.methods[0].is_invocable());
    }

    #[test]
    fn variadic_must_end_with_array() {
        let mut registry = TypeRegistry::with_builtins();
        let err = registry
            .register_class("Bad")
            .variadic_method("sum", vec![int(), int()], int(), noop)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::InvalidVariadic {
                type_name: "Bad".to_string(),
                method: "sum".to_string()
            }
        );
    }

    #[test]
    fn concrete_method_needs_implementation() {
        let mut registry = TypeRegistry::with_builtins();
        let err = registry
            .register_class("Bad")
            .method_def(MethodDef::new("run", vec![], TypeRef::Void), None)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingImplementation { .. }));
    }

    #[test]
    fn extends_and_implements_check_kinds() {
        let mut registry = TypeRegistry::with_builtins();
        let err = registry.register_class("A").extends("Comparator").build().unwrap_err();
        assert_eq!(err, RegistrationError::NotAClass("Comparator".to_string()));

        let err = registry.register_class("B").implements("String").build().unwrap_err();
        assert_eq!(err, RegistrationError::NotAnInterface("String".to_string()));

        let err = registry.register_class("C").extends("Nope").build().unwrap_err();
        assert_eq!(err, RegistrationError::TypeNotFound("Nope".to_string()));
    }

    #[test]
    fn fields_keep_visibility() {
        let mut registry = TypeRegistry::with_builtins();
        let entry = registry
            .register_class("Point")
            .field("x", int())
            .private_field("secret", int())
            .build()
            .unwrap();
        assert_eq!(entry.fields[0].visibility, Visibility::Public);
        assert_eq!(entry.fields[1].visibility, Visibility::Private);
    }
}
