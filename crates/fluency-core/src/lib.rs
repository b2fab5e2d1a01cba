//! Core types for dynamic callable resolution.
//!
//! This crate provides the shared vocabulary of the fluency workspace:
//!
//! - [`Value`] - runtime values (scalars, strings, arrays, objects, callables)
//! - [`TypeRef`] - declared parameter and return kinds
//! - [`TypeEntry`], [`MethodEntry`], [`FieldEntry`] - runtime type descriptors
//! - [`NativeFn`], [`CallContext`] - native member implementations
//! - [`Callable`], [`Predicate`] - the uniform invocation abstraction
//! - [`builtins`] - descriptors of the builtin types
//! - error types for every phase

pub mod builtins;
mod callable;
mod convert;
mod entries;
mod error;
mod native_fn;
mod predicate;
mod primitive_kind;
mod shape;
mod type_hash;
mod type_ref;
mod value;
mod visibility;

pub use callable::{Call, Callable};
pub use convert::{FromValue, IntoValue};
pub use entries::{
    Ancestors, FieldEntry, MethodDef, MethodEntry, MethodFlags, TypeEntry, TypeKind,
    UNIVERSAL_METHODS,
};
pub use error::{
    CoercionError, ConversionError, DispatchError, MirrorError, NativeError, RegistrationError,
};
pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use predicate::{Predicate, Test};
pub use primitive_kind::{BOXED, PrimitiveKind};
pub use shape::Adapted;
pub use type_hash::{TypeHash, hash_constants};
pub use type_ref::TypeRef;
pub use value::{ArrayRef, ObjectRef, Value, compare_natural};
pub use visibility::Visibility;
