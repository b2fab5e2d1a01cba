//! The resolution engine entry points.

use fluency_core::{Callable, DispatchError, FromValue, Value};
use tracing::{debug, trace};

use crate::assemble::assemble;
use crate::closures::{BoundMethod, MethodName};
use crate::invoker::invoke;
use crate::resolver::resolve;
use crate::scan::{Access, scan};

/// Resolves and invokes members by name at a fixed access level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatcher {
    access: Access,
}

impl Dispatcher {
    /// A dispatcher that sees public members only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that also sees the runtime type's own non-public members.
    pub fn privileged() -> Self {
        Self::with_access(Access::Privileged)
    }

    pub fn with_access(access: Access) -> Self {
        Self { access }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Find the member of `target`'s runtime type best matching `name` and
    /// `args`, and invoke it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_and_invoke(
        &self,
        target: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let Some(ty) = target.type_entry() else {
            return Err(resolution_failure(target, name, args));
        };
        let candidates = scan(&ty, name, self.access);

        if let Some(candidate) = resolve(&candidates, args) {
            trace!(
                target_type = %ty.name,
                member = %candidate.member.qualified_name(),
                kind = ?candidate.kind,
                "resolved member"
            );
            let invocation_args = assemble(&candidate, args)?;
            return invoke(target, &candidate, &invocation_args);
        }

        if let Some(hidden) = resolve(&candidates.hidden_candidates(), args) {
            debug!(
                target_type = %ty.name,
                member = %hidden.member.qualified_name(),
                visibility = %hidden.member.method.visibility(),
                "member hidden by access level"
            );
            return Err(DispatchError::access_denied(
                &ty.name,
                name,
                format!("{} member", hidden.member.method.visibility()),
            ));
        }

        let err = resolution_failure(target, name, args);
        debug!(error = %err, "resolution failed");
        Err(err)
    }

    /// Resolve, invoke and narrow the result to `T`.
    pub fn call_method<T: FromValue>(
        &self,
        target: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<T, DispatchError> {
        let result = self.resolve_and_invoke(target, name, args)?;
        Ok(T::from_value(&result)?)
    }

    /// A callable invoking `name` on `target` at this dispatcher's access level.
    pub fn bind(&self, target: Value, name: impl Into<String>) -> Callable {
        Callable::new(BoundMethod::with_dispatcher(target, name, *self))
    }

    /// A callable invoking `name` on its first argument.
    pub fn method_name(&self, name: impl Into<String>) -> Callable {
        Callable::new(MethodName::with_dispatcher(name, *self))
    }
}

fn resolution_failure(target: &Value, name: &str, args: &[Value]) -> DispatchError {
    DispatchError::Resolution {
        name: name.to_string(),
        target_type: target.type_name(),
        args: args.iter().map(Value::type_name).collect(),
    }
}

/// Resolve and invoke with public access.
pub fn resolve_and_invoke(target: &Value, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
    Dispatcher::new().resolve_and_invoke(target, name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluency_core::{ArrayRef, CallContext, PrimitiveKind, TypeRef};
    use fluency_registry::TypeRegistry;

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class("Counter")
            .method("inc", vec![int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                ctx.set_return(i + 1);
                Ok(())
            })
            .method("inc", vec![int(), int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                let offset: i32 = ctx.arg(1)?;
                ctx.set_return(i + offset);
                Ok(())
            })
            .variadic_method(
                "sum",
                vec![int(), TypeRef::array_of(int())],
                int(),
                |ctx: &mut CallContext| {
                    let start: i32 = ctx.arg(0)?;
                    let rest: ArrayRef = ctx.arg(1)?;
                    let mut total = start;
                    for item in rest.items().iter() {
                        total += i32::from_value(item)?;
                    }
                    ctx.set_return(total);
                    Ok(())
                },
            )
            .private_method("reset", vec![], int(), |ctx: &mut CallContext| {
                ctx.set_return(0);
                Ok(())
            })
            .method("nested", vec![], int(), |ctx: &mut CallContext| {
                let inner = resolve_and_invoke(ctx.this(), "doesNotExist", &[])?;
                ctx.set_return_slot(inner);
                Ok(())
            })
            .build()
            .unwrap();
        registry
    }

    fn counter(registry: &TypeRegistry) -> Value {
        Value::Object(registry.instantiate("Counter").unwrap())
    }

    #[test]
    fn arity_overloads() {
        let registry = registry();
        let target = counter(&registry);
        assert_eq!(resolve_and_invoke(&target, "inc", &[Value::Int32(0)]).unwrap(), Value::Int32(1));
        assert_eq!(
            resolve_and_invoke(&target, "inc", &[Value::Int32(0), Value::Int32(9)]).unwrap(),
            Value::Int32(9)
        );
    }

    #[test]
    fn variadic_sum() {
        let registry = registry();
        let target = counter(&registry);
        let args = [Value::Int32(0), Value::Int32(1), Value::Int32(2), Value::Int32(3)];
        assert_eq!(resolve_and_invoke(&target, "sum", &args).unwrap(), Value::Int32(6));
    }

    #[test]
    fn unknown_member_is_resolution_failure() {
        let registry = registry();
        let target = counter(&registry);
        let err = resolve_and_invoke(&target, "doesNotExist", &[Value::Int32(1)]).unwrap_err();
        match err {
            DispatchError::Resolution { name, target_type, args } => {
                assert_eq!(name, "doesNotExist");
                assert_eq!(target_type, "Counter");
                assert_eq!(args, vec!["Integer".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_target_is_resolution_failure() {
        let err = resolve_and_invoke(&Value::Null, "inc", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::Resolution { target_type, .. } if target_type == "null"));
    }

    #[test]
    fn private_member_needs_privilege() {
        let registry = registry();
        let target = counter(&registry);
        let err = resolve_and_invoke(&target, "reset", &[]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::AccessDenied { ref reason, .. } if reason == "private member"
        ));
        let privileged = Dispatcher::privileged();
        assert_eq!(privileged.resolve_and_invoke(&target, "reset", &[]).unwrap(), Value::Int32(0));
    }

    #[test]
    fn nested_failure_is_unwrapped() {
        let registry = registry();
        let target = counter(&registry);
        let err = resolve_and_invoke(&target, "nested", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::Resolution { name, .. } if name == "doesNotExist"));
    }

    #[test]
    fn call_method_narrows() {
        let registry = registry();
        let target = counter(&registry);
        let n: i64 = Dispatcher::new().call_method(&target, "inc", &[Value::Int32(4)]).unwrap();
        assert_eq!(n, 5);
        let err = Dispatcher::new()
            .call_method::<String>(&target, "inc", &[Value::Int32(4)])
            .unwrap_err();
        assert!(matches!(err, DispatchError::Conversion(_)));
    }

    #[test]
    fn builtin_values_dispatch() {
        assert_eq!(
            resolve_and_invoke(&Value::string("abc"), "length", &[]).unwrap(),
            Value::Int32(3)
        );
        assert_eq!(
            resolve_and_invoke(&Value::Int32(3), "to_string", &[]).unwrap(),
            Value::string("3")
        );
    }

    #[test]
    fn bind_and_method_name() {
        let registry = registry();
        let target = counter(&registry);
        let bound = Dispatcher::new().bind(target.clone(), "inc");
        assert_eq!(bound.call(&[Value::Int32(1)]).unwrap(), Value::Int32(2));

        let by_name = Dispatcher::new().method_name("inc");
        assert_eq!(by_name.call(&[target, Value::Int32(1)]).unwrap(), Value::Int32(2));
    }
}
