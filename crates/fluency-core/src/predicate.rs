//! Boolean-valued callables with negation.

use std::fmt;
use std::rc::Rc;

use crate::{Call, Callable, DispatchError, Value};

/// A boolean-valued test over runtime values.
pub trait Test {
    fn test(&self, args: &[Value]) -> Result<bool, DispatchError>;

    fn describe(&self) -> String {
        "predicate".to_string()
    }
}

/// A callable whose result is a boolean.
///
/// Negating a negated predicate hands back the predicate it negated.
#[derive(Clone)]
pub struct Predicate {
    inner: Rc<PredicateKind>,
}

enum PredicateKind {
    Native(Box<dyn Test>),
    Negated(Predicate),
}

impl Predicate {
    /// Wrap a [`Test`] implementation.
    pub fn new<T: Test + 'static>(test: T) -> Self {
        Self {
            inner: Rc::new(PredicateKind::Native(Box::new(test))),
        }
    }

    /// Create a predicate from a native closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<bool, DispatchError> + 'static,
    {
        Self::new(FnTest(f))
    }

    /// Adapt a callable: `Bool(b)` is `b`, `Null` is false, anything else fails.
    pub fn from_callable(callable: Callable) -> Self {
        Self::new(CallableTest(callable))
    }

    /// Evaluate.
    pub fn eval(&self, args: &[Value]) -> Result<bool, DispatchError> {
        match &*self.inner {
            PredicateKind::Native(test) => test.test(args),
            PredicateKind::Negated(original) => original.eval(args).map(|b| !b),
        }
    }

    /// Evaluate and complement.
    pub fn not_eval(&self, args: &[Value]) -> Result<bool, DispatchError> {
        self.eval(args).map(|b| !b)
    }

    /// A predicate with inverted results.
    pub fn negated(&self) -> Predicate {
        match &*self.inner {
            PredicateKind::Negated(original) => original.clone(),
            PredicateKind::Native(_) => Predicate {
                inner: Rc::new(PredicateKind::Negated(self.clone())),
            },
        }
    }

    /// View as a callable returning `Bool`.
    pub fn to_callable(&self) -> Callable {
        Callable::new(PredicateCall(self.clone()))
    }

    /// Whether both are the same predicate.
    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            PredicateKind::Native(test) => write!(f, "{}", test.describe()),
            PredicateKind::Negated(original) => write!(f, "not {original}"),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({self})")
    }
}

struct FnTest<F>(F);

impl<F> Test for FnTest<F>
where
    F: Fn(&[Value]) -> Result<bool, DispatchError>,
{
    fn test(&self, args: &[Value]) -> Result<bool, DispatchError> {
        (self.0)(args)
    }
}

struct CallableTest(Callable);

impl Test for CallableTest {
    fn test(&self, args: &[Value]) -> Result<bool, DispatchError> {
        match self.0.call(args)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(DispatchError::PredicateType {
                actual: other.type_name(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("predicate of {}", self.0)
    }
}

struct PredicateCall(Predicate);

impl Call for PredicateCall {
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        self.0.eval(args).map(Value::Bool)
    }

    fn describe(&self) -> String {
        self.0.to_string()
    }
}
