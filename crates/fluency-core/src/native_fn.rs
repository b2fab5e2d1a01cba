//! Native function storage and execution context.
//!
//! Every invocable member of a type descriptor is backed by a [`NativeFn`].
//! The engine calls it with a [`CallContext`] holding the receiver, the
//! assembled arguments and a return slot.

use std::any::Any;
use std::cell::{Ref, RefMut};
use std::fmt;
use std::sync::Arc;

use crate::{FromValue, IntoValue, NativeError, ObjectRef, Value};

/// Type-erased native function.
///
/// The inner callable is shared through `Arc` so descriptors holding it can
/// be cloned and stored in process-wide tables.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    /// Create a new NativeFn from a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this native function with the given context.
    pub fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        self.inner.call(ctx)
    }

    /// Whether both share the same underlying callable.
    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Trait for callable native functions.
pub trait NativeCallable {
    /// Call this function with the given context.
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError>;
}

// Implement NativeCallable for closures that take CallContext
impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext) -> Result<(), NativeError>,
{
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        (self)(ctx)
    }
}

/// Execution context for a native call.
pub struct CallContext<'a> {
    /// Receiver of the call
    this: &'a Value,
    /// Invocation arguments, variadic tail already assembled
    args: &'a [Value],
    /// Return value slot, `Null` unless set
    return_slot: &'a mut Value,
}

impl<'a> CallContext<'a> {
    /// Create a new call context.
    pub fn new(this: &'a Value, args: &'a [Value], return_slot: &'a mut Value) -> Self {
        Self {
            this,
            args,
            return_slot,
        }
    }

    /// Get the number of arguments.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// All arguments.
    pub fn args(&self) -> &[Value] {
        self.args
    }

    /// Get a raw reference to an argument.
    pub fn arg_slot(&self, index: usize) -> Result<&Value, NativeError> {
        self.args
            .get(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.arg_count(),
            })
    }

    /// Get an argument converted to `T`.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, NativeError> {
        Ok(T::from_value(self.arg_slot(index)?)?)
    }

    /// The receiver.
    pub fn this(&self) -> &Value {
        self.this
    }

    /// The receiver as an object.
    pub fn this_object(&self) -> Result<&ObjectRef, NativeError> {
        self.this.as_object().ok_or_else(|| {
            NativeError::invalid_this(format!("expected an object, got {}", self.this.type_name()))
        })
    }

    /// Borrow the receiver's native payload as `T`.
    pub fn this_native<T: Any>(&self) -> Result<Ref<'_, T>, NativeError> {
        let object = self.this_object()?;
        object.native::<T>().ok_or_else(|| {
            NativeError::invalid_this(format!(
                "'{}' carries no {} payload",
                object.type_name(),
                std::any::type_name::<T>()
            ))
        })
    }

    /// Mutably borrow the receiver's native payload as `T`.
    pub fn this_native_mut<T: Any>(&self) -> Result<RefMut<'_, T>, NativeError> {
        let object = self.this_object()?;
        object.native_mut::<T>().ok_or_else(|| {
            NativeError::invalid_this(format!(
                "'{}' carries no {} payload",
                object.type_name(),
                std::any::type_name::<T>()
            ))
        })
    }

    /// Set the return value.
    pub fn set_return<T: IntoValue>(&mut self, value: T) {
        *self.return_slot = value.into_value();
    }

    /// Set the return value from a raw value.
    pub fn set_return_slot(&mut self, value: Value) {
        *self.return_slot = value;
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("this", &self.this.type_name())
            .field("arg_count", &self.arg_count())
            .finish()
    }
}
