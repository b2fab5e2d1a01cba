//! Runtime type compatibility.
//!
//! The rules are deliberately narrow: primitive and boxed declarations of
//! the same kind are interchangeable, `Null` matches nothing, and there is
//! no numeric widening.

use fluency_core::{TypeRef, Value};

/// Can `value` be passed where `declared` is expected?
pub fn accepts(declared: &TypeRef, value: &Value) -> bool {
    if value.is_null() {
        return false;
    }
    match declared {
        TypeRef::Void => false,
        TypeRef::Any => true,
        TypeRef::Primitive(kind) | TypeRef::Boxed(kind) => value.scalar_kind() == Some(*kind),
        TypeRef::String => matches!(value, Value::String(_)),
        TypeRef::Named { hash, .. } => value
            .type_entry()
            .is_some_and(|entry| entry.is_subtype_of(*hash)),
        TypeRef::Array(element) => value
            .as_array()
            .is_some_and(|array| type_assignable(element, array.element())),
        TypeRef::Callable => matches!(value, Value::Callable(_) | Value::Predicate(_)),
        TypeRef::Predicate => matches!(value, Value::Predicate(_)),
    }
}

/// Is a value declared as `from` assignable to `to`?
///
/// Named kinds compare by identity only, so `Dog[]` is not a `Animal[]`;
/// it is an `Object[]`.
pub fn type_assignable(to: &TypeRef, from: &TypeRef) -> bool {
    match (to, from) {
        (TypeRef::Void, _) | (_, TypeRef::Void) => false,
        (TypeRef::Any, _) => true,
        (
            TypeRef::Primitive(a) | TypeRef::Boxed(a),
            TypeRef::Primitive(b) | TypeRef::Boxed(b),
        ) => a == b,
        (TypeRef::Callable, TypeRef::Predicate) => true,
        (TypeRef::Array(to), TypeRef::Array(from)) => type_assignable(to, from),
        (TypeRef::Named { hash: a, .. }, TypeRef::Named { hash: b, .. }) => a == b,
        (to, from) => to == from,
    }
}
