//! Closure coercion.

mod coercion;

pub use coercion::{coerce_to_callable, coerce_to_predicate};
pub use fluency_dispatch::{BoundMethod, ImplementedMethod, MethodName};
