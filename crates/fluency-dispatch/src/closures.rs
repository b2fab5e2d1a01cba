//! Callables that resolve a member by name each time they are invoked, and
//! one that is pinned to a single implementation.

use fluency_core::{Call, DispatchError, MethodDef, Value};
use tracing::trace;

use crate::assemble::assemble;
use crate::dispatcher::Dispatcher;
use crate::invoker::invoke;
use crate::resolver::{Candidate, MatchKind, is_fixed_match, varargs_match};
use crate::scan::MemberDescriptor;

/// Invokes `name` on its first argument, passing the rest as arguments.
#[derive(Debug, Clone)]
pub struct MethodName {
    name: String,
    dispatcher: Dispatcher,
}

impl MethodName {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_dispatcher(name, Dispatcher::new())
    }

    pub fn with_dispatcher(name: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Call for MethodName {
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        let (target, rest) = args.split_first().ok_or_else(|| DispatchError::MissingTarget {
            name: self.name.clone(),
        })?;
        self.dispatcher.resolve_and_invoke(target, &self.name, rest)
    }

    fn describe(&self) -> String {
        format!("method name '{}'", self.name)
    }
}

/// Invokes `name` on a fixed target.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    target: Value,
    name: String,
    dispatcher: Dispatcher,
}

impl BoundMethod {
    pub fn new(target: Value, name: impl Into<String>) -> Self {
        Self::with_dispatcher(target, name, Dispatcher::new())
    }

    pub fn with_dispatcher(target: Value, name: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            target,
            name: name.into(),
            dispatcher,
        }
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Call for BoundMethod {
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        self.dispatcher.resolve_and_invoke(&self.target, &self.name, args)
    }

    fn describe(&self) -> String {
        format!("{}.{}", self.target.type_name(), self.name)
    }
}

/// Invokes the implementation of one contract method on a fixed target.
///
/// Other members sharing the name are never considered, whatever their
/// visibility. Arguments the implementation does not accept fail resolution.
#[derive(Debug, Clone)]
pub struct ImplementedMethod {
    target: Value,
    contract: MethodDef,
}

impl ImplementedMethod {
    pub fn new(target: Value, contract: MethodDef) -> Self {
        Self { target, contract }
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    pub fn contract(&self) -> &MethodDef {
        &self.contract
    }

    fn unresolved(&self, args: &[Value]) -> DispatchError {
        DispatchError::Resolution {
            name: self.contract.name.clone(),
            target_type: self.target.type_name(),
            args: args.iter().map(Value::type_name).collect(),
        }
    }
}

impl Call for ImplementedMethod {
    fn call(&self, args: &[Value]) -> Result<Value, DispatchError> {
        let ty = self.target.type_entry().ok_or_else(|| self.unresolved(args))?;
        let (owner, method) = ty
            .find_implementation(&self.contract.name, &self.contract.params)
            .ok_or_else(|| self.unresolved(args))?;

        let member = MemberDescriptor::new(method, owner);
        let kind = if is_fixed_match(&member, args) {
            MatchKind::Fixed
        } else if member.variadic {
            varargs_match(&member, args)
                .map(MatchKind::VarArgs)
                .ok_or_else(|| self.unresolved(args))?
        } else {
            return Err(self.unresolved(args));
        };
        trace!(member = %member.qualified_name(), ?kind, "forwarding to implementation");

        let candidate = Candidate { member, kind };
        let invocation_args = assemble(&candidate, args)?;
        invoke(&self.target, &candidate, &invocation_args)
    }

    fn describe(&self) -> String {
        format!("{}.{}", self.target.type_name(), self.contract.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluency_core::{CallContext, Callable, PrimitiveKind, TypeRef};
    use fluency_registry::TypeRegistry;

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn leaky() -> Value {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class("Leaky")
            .method("apply", vec![int()], int(), |ctx: &mut CallContext| {
                let i: i32 = ctx.arg(0)?;
                ctx.set_return(i + 1);
                Ok(())
            })
            .private_method("apply", vec![TypeRef::String], TypeRef::String, |ctx: &mut CallContext| {
                ctx.set_return("private internals");
                Ok(())
            })
            .variadic_method(
                "sum",
                vec![TypeRef::array_of(int())],
                int(),
                |ctx: &mut CallContext| {
                    let items: fluency_core::ArrayRef = ctx.arg(0)?;
                    ctx.set_return(items.len() as i32);
                    Ok(())
                },
            )
            .build()
            .unwrap();
        Value::Object(registry.instantiate("Leaky").unwrap())
    }

    #[test]
    fn method_name_targets_first_argument() {
        let length = Callable::new(MethodName::new("length"));
        assert_eq!(length.call(&[Value::string("four")]).unwrap(), Value::Int32(4));
        assert_eq!(length.to_string(), "method name 'length'");
    }

    #[test]
    fn method_name_passes_rest() {
        let concat = Callable::new(MethodName::new("concat"));
        let joined = concat
            .call(&[Value::string("ab"), Value::string("cd")])
            .unwrap();
        assert_eq!(joined, Value::string("abcd"));
    }

    #[test]
    fn method_name_without_arguments() {
        let length = Callable::new(MethodName::new("length"));
        let err = length.call(&[]).unwrap_err();
        assert!(matches!(err, DispatchError::MissingTarget { name } if name == "length"));
    }

    #[test]
    fn bound_method_resolves_each_call() {
        let starts = Callable::new(BoundMethod::new(Value::string("fluent"), "starts_with"));
        assert_eq!(starts.call(&[Value::string("flu")]).unwrap(), Value::Bool(true));
        assert_eq!(starts.call(&[Value::string("x")]).unwrap(), Value::Bool(false));
        assert_eq!(starts.to_string(), "String.starts_with");
        assert!(starts.call(&[Value::Int32(1)]).is_err());
    }

    #[test]
    fn implemented_method_ignores_other_overloads() {
        let apply = Callable::new(ImplementedMethod::new(
            leaky(),
            MethodDef::new("apply", vec![int()], int()),
        ));
        assert_eq!(apply.call(&[Value::Int32(1)]).unwrap(), Value::Int32(2));
        assert_eq!(apply.to_string(), "Leaky.apply");
        let err = apply.call(&[Value::string("x")]).unwrap_err();
        assert!(matches!(err, DispatchError::Resolution { name, .. } if name == "apply"));
    }

    #[test]
    fn implemented_method_wraps_variadic_tail() {
        let sum = Callable::new(ImplementedMethod::new(
            leaky(),
            MethodDef::new("sum", vec![TypeRef::array_of(int())], int()),
        ));
        let args = [Value::Int32(1), Value::Int32(2), Value::Int32(3)];
        assert_eq!(sum.call(&args).unwrap(), Value::Int32(3));
    }

    #[test]
    fn implemented_method_needs_an_implementation() {
        let missing = Callable::new(ImplementedMethod::new(
            Value::string("text"),
            MethodDef::new("apply", vec![int()], int()),
        ));
        assert!(matches!(
            missing.call(&[Value::Int32(1)]),
            Err(DispatchError::Resolution { .. })
        ));
    }
}
