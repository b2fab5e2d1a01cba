//! Dynamic callable resolution, closure coercion and fluent collections.
//!
//! The workspace is split leaf-first:
//!
//! - [`fluency_core`] - runtime values, type descriptors, `Callable` and `Predicate`
//! - [`fluency_registry`] - `TypeRegistry` and the class/interface builders
//! - [`fluency_dispatch`] - the resolution engine
//! - this crate - closure coercion, collections and `Mirror`
//!
//! # Example
//!
//! ```
//! use fluency::prelude::*;
//!
//! let mut registry = TypeRegistry::with_builtins();
//! let int = TypeRef::boxed(PrimitiveKind::Int32);
//! registry
//!     .register_class("Counter")
//!     .method("inc", vec![int.clone()], int.clone(), |ctx: &mut CallContext| {
//!         let i: i32 = ctx.arg(0)?;
//!         ctx.set_return(i + 1);
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! let counter = Value::Object(registry.instantiate("Counter").unwrap());
//! let inc = coerce_to_callable(&Value::string("inc")).unwrap();
//! assert_eq!(inc.call(&[counter, Value::Int32(41)]).unwrap(), Value::Int32(42));
//! ```

pub mod closures;
pub mod collections;
pub mod mirror;

pub use fluency_core;
pub use fluency_dispatch;
pub use fluency_registry;

pub use closures::{coerce_to_callable, coerce_to_predicate};
pub use collections::{Enumerable, Lazy, Sequence, compare_values, natural_order};
pub use fluency_dispatch::resolve_and_invoke;
pub use mirror::{InstanceField, Mirror};

pub mod prelude {
    pub use crate::closures::{
        BoundMethod, ImplementedMethod, MethodName, coerce_to_callable, coerce_to_predicate,
    };
    pub use crate::collections::{Enumerable, Lazy, Sequence, compare_values, natural_order};
    pub use crate::mirror::{InstanceField, Mirror};
    pub use fluency_core::{
        Adapted, ArrayRef, Call, CallContext, Callable, CoercionError, ConversionError,
        DispatchError, FromValue, IntoValue, MirrorError, NativeError, ObjectRef, Predicate,
        PrimitiveKind, RegistrationError, Test, TypeEntry, TypeRef, Value, Visibility, builtins,
    };
    pub use fluency_dispatch::{Access, Dispatcher, resolve_and_invoke};
    pub use fluency_registry::{ClassBuilder, InterfaceBuilder, TypeRegistry};
}
