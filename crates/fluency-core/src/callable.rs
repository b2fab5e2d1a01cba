//! The uniform invocation abstraction.

use std::fmt;
use std::rc::Rc;

use crate::{DispatchError, FromValue, Value};

/// Something that can be invoked with a list of runtime values.
///
/// Implement this to create custom callables; wrap them with
/// [`Callable::new`].
pub trait Call {
    /// Invoke with the given arguments.
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError>;

    /// Short description used when the callable is displayed.
    fn describe(&self) -> String {
        "callable".to_string()
    }
}

/// An opaque, shareable invocable unit.
///
/// Clones share the same underlying behavior and compare equal; two
/// separately created callables never do.
#[derive(Clone)]
pub struct Callable {
    inner: Rc<dyn Call>,
}

impl Callable {
    /// Wrap a [`Call`] implementation.
    pub fn new<C: Call + 'static>(call: C) -> Self {
        Self {
            inner: Rc::new(call),
        }
    }

    /// Create a callable from a native closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, DispatchError> + 'static,
    {
        Self::new(FnCall(f))
    }

    /// Invoke with the given arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        self.inner.call(args)
    }

    /// Invoke and narrow the result to `T`.
    pub fn invoke<T: FromValue>(&self, args: &[Value]) -> Result<T, DispatchError> {
        let result = self.call(args)?;
        Ok(T::from_value(&result)?)
    }

    /// Whether both share the same underlying behavior.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.describe())
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.inner.describe())
    }
}

struct FnCall<F>(F);

impl<F> Call for FnCall<F>
where
    F: Fn(&[Value]) -> Result<Value, DispatchError>,
{
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        (self.0)(args)
    }

    fn describe(&self) -> String {
        "closure".to_string()
    }
}
