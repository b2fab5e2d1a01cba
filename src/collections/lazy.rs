//! Lazily evaluated views over an [`Enumerable`](super::Enumerable).
//!
//! Blocks are coerced when the view is built and called only as elements are
//! pulled. A view stops after yielding its first error.

use std::slice;

use fluency_core::{Callable, DispatchError, Predicate, Value};

use crate::closures::{coerce_to_callable, coerce_to_predicate};
use crate::collections::Sequence;

type Step<'a> = Box<dyn Iterator<Item = Result<Value, DispatchError>> + 'a>;

/// A deferred chain of select, reject, map and take steps.
pub struct Lazy<'a> {
    inner: Step<'a>,
    failed: bool,
}

impl<'a> Lazy<'a> {
    /// A view yielding `items` as they are.
    pub fn over(items: &'a [Value]) -> Self {
        Self::from_step(Box::new(items.iter().cloned().map(Ok)))
    }

    fn from_step(inner: Step<'a>) -> Self {
        Self { inner, failed: false }
    }

    /// Keep elements satisfying `block`.
    pub fn select(self, block: &Value) -> Result<Self, DispatchError> {
        let predicate = coerce_to_predicate(block)?;
        Ok(Self::from_step(Box::new(Select {
            inner: self,
            predicate,
            keep: true,
        })))
    }

    /// Drop elements satisfying `block`.
    pub fn reject(self, block: &Value) -> Result<Self, DispatchError> {
        let predicate = coerce_to_predicate(block)?;
        Ok(Self::from_step(Box::new(Select {
            inner: self,
            predicate,
            keep: false,
        })))
    }

    /// Replace each element with `block(element)`.
    pub fn map(self, block: &Value) -> Result<Self, DispatchError> {
        let callable = coerce_to_callable(block)?;
        Ok(Self::from_step(Box::new(Map { inner: self, callable })))
    }

    /// At most `n` elements. Nothing past the `n`th is pulled.
    pub fn take(self, n: usize) -> Self {
        Self::from_step(Box::new(Take {
            inner: self,
            remaining: n,
        }))
    }

    /// Pull every element.
    pub fn to_sequence(self) -> Result<Sequence, DispatchError> {
        self.collect()
    }
}

impl Iterator for Lazy<'_> {
    type Item = Result<Value, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.inner.next();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

impl std::fmt::Debug for Lazy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lazy").field("failed", &self.failed).finish_non_exhaustive()
    }
}

struct Select<'a> {
    inner: Lazy<'a>,
    predicate: Predicate,
    keep: bool,
}

impl Iterator for Select<'_> {
    type Item = Result<Value, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        for item in self.inner.by_ref() {
            let item = match item {
                Ok(item) => item,
                Err(err) => return Some(Err(err)),
            };
            match self.predicate.eval(slice::from_ref(&item)) {
                Ok(passed) if passed == self.keep => return Some(Ok(item)),
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

struct Map<'a> {
    inner: Lazy<'a>,
    callable: Callable,
}

impl Iterator for Map<'_> {
    type Item = Result<Value, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(item.and_then(|item| self.callable.call(slice::from_ref(&item))))
    }
}

struct Take<'a> {
    inner: Lazy<'a>,
    remaining: usize,
}

impl Iterator for Take<'_> {
    type Item = Result<Value, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.inner.next()
    }
}
