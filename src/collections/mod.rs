//! Collections consuming coerced callables.

mod comparator;
mod enumerable;
mod lazy;

pub use comparator::{compare_values, natural_order};
pub use enumerable::{Enumerable, Sequence};
pub use lazy::Lazy;
