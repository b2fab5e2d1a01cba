//! Natural ordering of runtime values.

use std::cmp::Ordering;

use fluency_core::{Callable, DispatchError, NativeError, Value, compare_natural};

/// Compare two values by their natural order.
///
/// Numbers compare numerically across kinds; strings, chars and booleans
/// compare with their own kind only.
pub fn compare_values(a: &Value, b: &Value) -> Result<Ordering, NativeError> {
    compare_natural(a, b).ok_or_else(|| {
        NativeError::other(format!(
            "{} and {} have no natural order",
            a.type_name(),
            b.type_name()
        ))
    })
}

/// A comparator callable: `(a, b)` to a negative, zero or positive `Integer`.
pub fn natural_order() -> Callable {
    Callable::new(NaturalOrder)
}

struct NaturalOrder;

impl fluency_core::Call for NaturalOrder {
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        let [a, b] = args else {
            return Err(DispatchError::Target(NativeError::ArgumentIndexOutOfBounds {
                index: 1,
                count: args.len(),
            }));
        };
        let ordering = compare_values(a, b).map_err(DispatchError::Target)?;
        Ok(Value::Int32(ordering as i32))
    }

    fn describe(&self) -> String {
        "natural order".to_string()
    }
}

/// Read a comparator result as an ordering.
pub(crate) fn ordering_of(result: &Value) -> Result<Ordering, DispatchError> {
    let n = result.as_i64().ok_or_else(|| {
        DispatchError::Target(NativeError::other(format!(
            "comparator returned {}, expected an integer",
            result.type_name()
        )))
    })?;
    Ok(n.cmp(&0))
}
