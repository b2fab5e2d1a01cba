//! Conversion traits between Rust types and runtime [`Value`]s.
//!
//! - [`FromValue`]: Extract a Rust value from a [`Value`]
//! - [`IntoValue`]: Convert a Rust value into a [`Value`]
//!
//! Integer extraction accepts any integral scalar and checks the range of the
//! target type. Float extraction accepts `Float` and `Double`.
//!
//! ## Example
//!
//! ```
//! use fluency_core::{FromValue, IntoValue, Value};
//!
//! let value = 42i32.into_value();
//! assert_eq!(i64::from_value(&value).unwrap(), 42);
//! assert!(i8::from_value(&Value::Int32(300)).is_err());
//! ```

use std::rc::Rc;

use crate::{ArrayRef, Callable, ConversionError, ObjectRef, Predicate, Value};

/// Extract a Rust value from a runtime value.
pub trait FromValue: Sized {
    /// Extract a value, failing with a `ConversionError` on incompatible kinds.
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

/// Convert a Rust value into a runtime value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

fn mismatch(expected: &'static str, value: &Value) -> ConversionError {
    match value {
        Value::Null => ConversionError::NullValue {
            target_type: expected,
        },
        other => ConversionError::TypeMismatch {
            expected,
            actual: other.type_name(),
        },
    }
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_int {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    let v = value.as_i64().ok_or_else(|| mismatch($name, value))?;
                    <$ty>::try_from(v).map_err(|_| ConversionError::IntegerOverflow {
                        value: v,
                        target_type: stringify!($ty),
                    })
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_int! {
    i8 => Int8, "Byte";
    i16 => Int16, "Short";
    i32 => Int32, "Integer";
    i64 => Int64, "Long";
}

// ============================================================================
// Float implementations
// ============================================================================

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Double(v) => Ok(*v),
            other => Err(mismatch("Double", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Double(v) => Ok(*v as f32),
            other => Err(mismatch("Float", other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

// ============================================================================
// Other scalars and strings
// ============================================================================

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        value.as_bool().ok_or_else(|| mismatch("Boolean", value))
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Char(c) => Ok(*c),
            other => Err(mismatch("Character", other)),
        }
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("String", value))
    }
}

impl FromValue for Rc<str> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(s) => Ok(Rc::clone(s)),
            other => Err(mismatch("String", other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for Rc<str> {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

// ============================================================================
// Reference values
// ============================================================================

macro_rules! impl_reference {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(inner) => Ok(inner.clone()),
                        other => Err(mismatch($name, other)),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_reference! {
    ArrayRef => Array, "Array";
    ObjectRef => Object, "Object";
    Callable => Callable, "Callable";
    Predicate => Predicate, "Predicate";
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }
}
