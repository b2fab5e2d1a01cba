//! Single-method shape adaptation.
//!
//! A [`Callable`] can stand in for any interface (or abstract base type)
//! with exactly one non-universal method. [`Callable::as_shape`] builds a
//! synthetic class implementing the shape whose designated method forwards
//! to the callable. The adapter object carries the callable as its native
//! payload, so the synthetic descriptor itself holds no runtime values.

use std::sync::Arc;

use tracing::trace;

use crate::{
    CallContext, Callable, CoercionError, DispatchError, MethodDef, MethodEntry, NativeError,
    NativeFn, ObjectRef, PrimitiveKind, TypeEntry, TypeKind, TypeRef, Value, builtins,
};

/// A callable adapted to a single-method shape.
#[derive(Debug, Clone)]
pub struct Adapted {
    shape: Arc<TypeEntry>,
    object: ObjectRef,
}

impl Adapted {
    /// The adapter as a value, accepted wherever the shape is declared.
    pub fn value(&self) -> Value {
        Value::Object(self.object.clone())
    }

    /// The shape this adapter implements.
    pub fn shape(&self) -> &Arc<TypeEntry> {
        &self.shape
    }

    /// Synthetic descriptor of the adapter.
    pub fn type_entry(&self) -> &Arc<TypeEntry> {
        self.object.type_entry()
    }

    /// Invoke a method of the shape through the adapter's dispatch table.
    pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let table = self.object.type_entry();
        let method = table
            .methods
            .iter()
            .find(|m| m.name() == name && m.params().len() == args.len())
            .ok_or_else(|| DispatchError::Resolution {
                name: name.to_string(),
                target_type: table.name.clone(),
                args: args.iter().map(Value::type_name).collect(),
            })?;
        let native = method.native.as_ref().ok_or_else(|| {
            DispatchError::access_denied(&table.name, name, "no implementation")
        })?;
        let this = self.value();
        let mut ret = Value::Null;
        native
            .call(&mut CallContext::new(&this, args, &mut ret))
            .map_err(DispatchError::from_native)?;
        Ok(ret)
    }
}

impl Callable {
    /// Adapt this callable to a single-method shape.
    pub fn as_shape(&self, shape: &Arc<TypeEntry>) -> Result<Adapted, CoercionError> {
        let designated = match shape.single_method() {
            Some(only) => only.def.clone(),
            None => {
                return Err(CoercionError::NotSingleMethod {
                    shape: shape.name.clone(),
                    count: shape.abstract_methods().len(),
                });
            }
        };

        trace!(shape = %shape.name, method = %designated.name, "adapting callable to shape");

        let mut table = TypeEntry::new(format!("{}$Adapter", shape.name), TypeKind::Class);
        table = match shape.kind {
            TypeKind::Interface => table.with_base(builtins::object()).with_interface(Arc::clone(shape)),
            TypeKind::Class => table.with_base(Arc::clone(shape)),
        };
        let mut forwarded = designated;
        forwarded.flags.remove(crate::MethodFlags::ABSTRACT);
        let table = table
            .with_method(MethodEntry::new(forwarded, NativeFn::new(forward_call)))
            .with_method(MethodEntry::new(
                MethodDef::new("equals", vec![TypeRef::Any], TypeRef::boxed(PrimitiveKind::Bool)),
                NativeFn::new(forward_equals),
            ))
            .with_method(MethodEntry::new(
                MethodDef::new("hash_code", vec![], TypeRef::boxed(PrimitiveKind::Int32)),
                NativeFn::new(forward_hash_code),
            ))
            .with_method(MethodEntry::new(
                MethodDef::new("to_string", vec![], TypeRef::String),
                NativeFn::new(forward_to_string),
            ))
            .finish();

        Ok(Adapted {
            shape: Arc::clone(shape),
            object: ObjectRef::with_native(Arc::new(table), self.clone()),
        })
    }
}

fn payload(ctx: &CallContext) -> Result<Callable, NativeError> {
    // Clone out so the payload is not borrowed while the callable runs.
    let callable = ctx.this_native::<Callable>()?.clone();
    Ok(callable)
}

fn forward_call(ctx: &mut CallContext) -> Result<(), NativeError> {
    let callable = payload(ctx)?;
    let result = callable.call(ctx.args())?;
    ctx.set_return_slot(result);
    Ok(())
}

fn forward_equals(ctx: &mut CallContext) -> Result<(), NativeError> {
    let callable = payload(ctx)?;
    let equal = match ctx.arg_slot(0)? {
        Value::Callable(other) => callable.ptr_eq(other),
        Value::Object(other) => other.native::<Callable>().is_some_and(|c| c.ptr_eq(&callable)),
        _ => false,
    };
    ctx.set_return(equal);
    Ok(())
}

fn forward_hash_code(ctx: &mut CallContext) -> Result<(), NativeError> {
    let hash = Value::Callable(payload(ctx)?).hash_code();
    ctx.set_return(hash);
    Ok(())
}

fn forward_to_string(ctx: &mut CallContext) -> Result<(), NativeError> {
    let text = payload(ctx)?.to_string();
    ctx.set_return(text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FromValue, TypeHash};

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn supplier() -> Arc<TypeEntry> {
        Arc::new(
            TypeEntry::new("Supplier", TypeKind::Interface)
                .with_method(MethodEntry::abstract_entry(MethodDef::new("get", vec![], TypeRef::Any)))
                .finish(),
        )
    }

    #[test]
    fn adapter_implements_shape() {
        let callable = Callable::from_fn(|_| Ok(Value::Int32(7)));
        let adapted = callable.as_shape(&supplier()).unwrap();
        assert!(adapted.type_entry().is_subtype_of(TypeHash::from_name("Supplier")));
        assert_eq!(adapted.shape().name, "Supplier");
        assert_eq!(adapted.call_method("get", &[]).unwrap(), Value::Int32(7));
    }

    #[test]
    fn adapter_forwards_arguments() {
        let callable = Callable::from_fn(|args| {
            let a = i32::from_value(&args[0])?;
            let b = i32::from_value(&args[1])?;
            Ok(Value::Int32(a.cmp(&b) as i32))
        });
        let adapted = callable.as_shape(&builtins::comparator()).unwrap();
        let result = adapted
            .call_method("compare", &[Value::Int32(1), Value::Int32(2)])
            .unwrap();
        assert_eq!(result, Value::Int32(-1));
    }

    #[test]
    fn universal_methods_answer_from_callable() {
        let callable = Callable::from_fn(|_| Ok(Value::Null));
        let adapted = callable.as_shape(&supplier()).unwrap();
        assert_eq!(
            adapted.call_method("to_string", &[]).unwrap(),
            Value::string("closure")
        );
        assert_eq!(
            adapted
                .call_method("equals", &[Value::Callable(callable.clone())])
                .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            adapted.call_method("equals", &[adapted.value()]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            adapted.call_method("hash_code", &[]).unwrap(),
            Value::Int32(Value::Callable(callable).hash_code())
        );
    }

    #[test]
    fn multi_method_shape_is_rejected() {
        let two = Arc::new(
            TypeEntry::new("Pair", TypeKind::Interface)
                .with_method(MethodEntry::abstract_entry(MethodDef::new("left", vec![], int())))
                .with_method(MethodEntry::abstract_entry(MethodDef::new("right", vec![], int())))
                .finish(),
        );
        let err = Callable::from_fn(|_| Ok(Value::Null)).as_shape(&two).unwrap_err();
        assert_eq!(
            err,
            CoercionError::NotSingleMethod {
                shape: "Pair".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn failing_callable_surfaces_original_error() {
        let callable = Callable::from_fn(|_| {
            Err(DispatchError::MissingTarget {
                name: "inner".to_string(),
            })
        });
        let adapted = callable.as_shape(&supplier()).unwrap();
        let err = adapted.call_method("get", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::MissingTarget { name } if name == "inner"));
    }
}
