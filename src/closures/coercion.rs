//! Mapping arbitrary values to the uniform [`Callable`] abstraction.
//!
//! ## Rules
//!
//! The first matching rule wins:
//!
//! | Value | Callable |
//! | --- | --- |
//! | `Null` | error |
//! | `Callable` / `Predicate` | itself |
//! | `String` | invokes the named member on its first argument |
//! | object with exactly one single-method interface | forwards to that method |
//! | `Comparator` subtype | forwards to `compare` |
//! | `Matcher` subtype | forwards to `matches` |
//!
//! Anything else is [`CoercionError::Unsupported`].

use std::sync::Arc;

use fluency_core::{Callable, CoercionError, ObjectRef, Predicate, TypeEntry, Value, builtins};
use fluency_dispatch::{ImplementedMethod, MethodName};
use tracing::debug;

/// Coerce `value` to a callable.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn coerce_to_callable(value: &Value) -> Result<Callable, CoercionError> {
    let result = match value {
        Value::Null => Err(CoercionError::Null),
        Value::Callable(callable) => Ok(callable.clone()),
        Value::Predicate(predicate) => Ok(predicate.to_callable()),
        Value::String(name) => Ok(Callable::new(MethodName::new(name.as_ref()))),
        Value::Object(object) => coerce_object(object),
        other => Err(unsupported(other)),
    };
    match &result {
        Ok(callable) => debug!(value = %value, callable = %callable, "coerced to callable"),
        Err(err) => debug!(value = %value, error = %err, "coercion failed"),
    }
    result
}

/// Coerce `value` to a predicate.
///
/// Predicates are returned as they are; anything else is coerced to a
/// callable whose results are read as booleans, `Null` counting as false.
pub fn coerce_to_predicate(value: &Value) -> Result<Predicate, CoercionError> {
    match value {
        Value::Predicate(predicate) => Ok(predicate.clone()),
        other => coerce_to_callable(other).map(Predicate::from_callable),
    }
}

fn coerce_object(object: &ObjectRef) -> Result<Callable, CoercionError> {
    let ty = object.type_entry();
    let value = Value::Object(object.clone());

    let shapes: Vec<Arc<TypeEntry>> = ty
        .all_interfaces()
        .into_iter()
        .filter(|iface| iface.single_method().is_some())
        .collect();
    match shapes.as_slice() {
        [] => {}
        [shape] => return forward(ty, value, shape),
        several => {
            return Err(CoercionError::Ambiguous {
                type_name: ty.name.clone(),
                interfaces: several.iter().map(|s| s.name.clone()).collect(),
            });
        }
    }

    for shape in [builtins::comparator(), builtins::matcher()] {
        if ty.is_subtype_of(shape.type_hash) {
            return forward(ty, value, &shape);
        }
    }
    Err(unsupported(&value))
}

/// A callable invoking the implementation of `shape`'s single method on `value`.
fn forward(ty: &TypeEntry, value: Value, shape: &TypeEntry) -> Result<Callable, CoercionError> {
    let Some(method) = shape.single_method() else {
        return Err(CoercionError::NotSingleMethod {
            shape: shape.name.clone(),
            count: shape.abstract_methods().len(),
        });
    };
    if ty.find_implementation(method.name(), method.params()).is_none() {
        return Err(CoercionError::Unbound {
            type_name: ty.name.clone(),
            method: method.def.to_string(),
        });
    }
    Ok(Callable::new(ImplementedMethod::new(value, method.def.clone())))
}

fn unsupported(value: &Value) -> CoercionError {
    CoercionError::Unsupported {
        value: format!("{value} ({})", value.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluency_core::{CallContext, DispatchError, PrimitiveKind, TypeRef};
    use fluency_registry::TypeRegistry;

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_interface("Doubler")
            .method("apply", vec![int()], int())
            .build()
            .unwrap();
        registry
            .register_interface("Greeter")
            .method("greet", vec![], TypeRef::String)
            .build()
            .unwrap();
        registry
            .register_class("Twice")
            .implements("Doubler")
            .method("apply", vec![int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                ctx.set_return(i * 2);
                Ok(())
            })
            .build()
            .unwrap();
        registry
            .register_class("SwissArmyKnife")
            .implements("Doubler")
            .implements("Greeter")
            .method("apply", vec![int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                ctx.set_return(i * 2);
                Ok(())
            })
            .method("greet", vec![], TypeRef::String, |ctx: &mut CallContext| {
                ctx.set_return("hi");
                Ok(())
            })
            .build()
            .unwrap();
        registry
            .register_class("Plain")
            .method("apply", vec![int()], int(), |_: &mut CallContext| Ok(()))
            .build()
            .unwrap();
        registry
    }

    fn object(registry: &TypeRegistry, name: &str) -> Value {
        Value::Object(registry.instantiate(name).unwrap())
    }

    #[test]
    fn null_is_rejected() {
        assert_eq!(coerce_to_callable(&Value::Null).unwrap_err(), CoercionError::Null);
    }

    #[test]
    fn callable_is_returned_as_is() {
        let callable = Callable::from_fn(|_| Ok(Value::Int32(1)));
        let coerced = coerce_to_callable(&Value::Callable(callable.clone())).unwrap();
        assert!(coerced.ptr_eq(&callable));
    }

    #[test]
    fn string_is_name_bound() {
        let coerced = coerce_to_callable(&Value::string("to_upper_case")).unwrap();
        assert_eq!(coerced.call(&[Value::string("abc")]).unwrap(), Value::string("ABC"));
        let err = coerced.call(&[]).unwrap_err();
        assert!(matches!(err, DispatchError::MissingTarget { .. }));
    }

    #[test]
    fn single_method_interface_is_structural() {
        let registry = registry();
        let coerced = coerce_to_callable(&object(&registry, "Twice")).unwrap();
        assert_eq!(coerced.call(&[Value::Int32(21)]).unwrap(), Value::Int32(42));
    }

    #[test]
    fn two_single_method_interfaces_are_ambiguous() {
        let registry = registry();
        let err = coerce_to_callable(&object(&registry, "SwissArmyKnife")).unwrap_err();
        match err {
            CoercionError::Ambiguous { type_name, interfaces } => {
                assert_eq!(type_name, "SwissArmyKnife");
                assert_eq!(interfaces, vec!["Doubler".to_string(), "Greeter".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unrelated_values_are_unsupported() {
        let registry = registry();
        assert!(matches!(
            coerce_to_callable(&object(&registry, "Plain")),
            Err(CoercionError::Unsupported { .. })
        ));
        assert!(matches!(
            coerce_to_callable(&Value::Int32(3)),
            Err(CoercionError::Unsupported { .. })
        ));
    }

    #[test]
    fn predicate_reads_booleans() {
        let yes = coerce_to_predicate(&Value::Callable(Callable::from_fn(|_| Ok(Value::Bool(true))))).unwrap();
        assert!(yes.eval(&[]).unwrap());

        let null = coerce_to_predicate(&Value::Callable(Callable::from_fn(|_| Ok(Value::Null)))).unwrap();
        assert!(!null.eval(&[]).unwrap());

        let number = coerce_to_predicate(&Value::Callable(Callable::from_fn(|_| Ok(Value::Int32(1))))).unwrap();
        assert!(matches!(
            number.eval(&[]),
            Err(DispatchError::PredicateType { actual }) if actual == "Integer"
        ));
    }

    #[test]
    fn predicate_is_returned_as_is() {
        let p = Predicate::from_fn(|_| Ok(true));
        let coerced = coerce_to_predicate(&Value::Predicate(p.clone())).unwrap();
        assert!(coerced.ptr_eq(&p));
    }

    #[test]
    fn string_predicate() {
        let empty = coerce_to_predicate(&Value::string("is_empty")).unwrap();
        assert!(empty.eval(&[Value::string("")]).unwrap());
        assert!(!empty.eval(&[Value::string("x")]).unwrap());
    }
}
