//! Member invocation.

use fluency_core::{CallContext, DispatchError, Value};
use tracing::debug;

use crate::resolver::Candidate;

/// Call the selected member on `target` with already assembled arguments.
///
/// A failure raised by the member is returned as [`DispatchError::Target`]
/// unless it is itself a nested dispatch failure, which is returned as is.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn invoke(
    target: &Value,
    candidate: &Candidate<'_>,
    invocation_args: &[Value],
) -> Result<Value, DispatchError> {
    let member = &candidate.member;
    let native = match &member.method.native {
        Some(native) if member.method.is_invocable() => native,
        _ => {
            return Err(DispatchError::access_denied(
                &member.owner.name,
                member.name,
                "member has no implementation",
            ));
        }
    };
    if invocation_args.len() != member.params.len() {
        return Err(DispatchError::assembly(
            member.qualified_name(),
            format!(
                "expected {} arguments, got {}",
                member.params.len(),
                invocation_args.len()
            ),
        ));
    }

    let mut ret = Value::Null;
    let mut ctx = CallContext::new(target, invocation_args, &mut ret);
    native.call(&mut ctx).map_err(|err| {
        debug!(member = %member.qualified_name(), error = %err, "member raised an error");
        DispatchError::from_native(err)
    })?;
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::scan::{Access, scan};
    use fluency_core::{NativeError, PrimitiveKind, TypeRef};
    use fluency_registry::TypeRegistry;

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class("Worker")
            .method("double", vec![int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                ctx.set_return(i * 2);
                Ok(())
            })
            .method("fail", vec![], TypeRef::Void, |_: &mut CallContext| {
                Err(NativeError::other("worker failed"))
            })
            .method("silent", vec![], TypeRef::Void, |_: &mut CallContext| Ok(()))
            .abstract_method("pending", vec![], TypeRef::Void)
            .build()
            .unwrap();
        registry
    }

    fn call(registry: &TypeRegistry, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let target = Value::Object(registry.instantiate("Worker").unwrap());
        let ty = target.type_entry().unwrap();
        let candidates = scan(&ty, name, Access::Public);
        let candidate = resolve(&candidates, args).unwrap();
        invoke(&target, &candidate, args)
    }

    #[test]
    fn returns_member_result() {
        let registry = registry();
        assert_eq!(call(&registry, "double", &[Value::Int32(21)]).unwrap(), Value::Int32(42));
    }

    #[test]
    fn missing_return_is_null() {
        let registry = registry();
        assert_eq!(call(&registry, "silent", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn target_error_is_preserved() {
        let registry = registry();
        let err = call(&registry, "fail", &[]).unwrap_err();
        match err {
            DispatchError::Target(NativeError::Other { message }) => assert_eq!(message, "worker failed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn abstract_member_is_access_denied() {
        let registry = registry();
        let err = call(&registry, "pending", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::AccessDenied { member, .. } if member == "pending"));
    }

    #[test]
    fn late_arity_mismatch_is_assembly_error() {
        let registry = registry();
        let target = Value::Object(registry.instantiate("Worker").unwrap());
        let ty = target.type_entry().unwrap();
        let candidates = scan(&ty, "double", Access::Public);
        let candidate = resolve(&candidates, &[Value::Int32(1)]).unwrap();
        let err = invoke(&target, &candidate, &[]).unwrap_err();
        assert!(matches!(err, DispatchError::Assembly { .. }));
    }
}
