//! Builtin type descriptors.
//!
//! Process-wide immutable descriptors for the universal base type, strings,
//! boxed scalars, arrays, callables and the comparator/matcher contracts.
//! Every builtin is initialized once on first use.

use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::{
    ArrayRef, CallContext, MethodDef, MethodEntry, NativeError, NativeFn, Predicate, PrimitiveKind, TypeEntry,
    TypeKind, TypeRef, Value, compare_natural,
};

/// Name of the universal base type.
pub const OBJECT: &str = "Object";
/// Name of the comparator contract.
pub const COMPARATOR: &str = "Comparator";
/// Name of the matcher base type.
pub const MATCHER: &str = "Matcher";

lazy_static! {
    static ref OBJECT_TYPE: Arc<TypeEntry> = Arc::new(object_type());
    static ref STRING_TYPE: Arc<TypeEntry> = Arc::new(string_type());
    static ref BOXED_TYPES: Vec<Arc<TypeEntry>> = PrimitiveKind::ALL
        .iter()
        .map(|kind| Arc::new(boxed_type(*kind)))
        .collect();
    static ref ARRAY_TYPE: Arc<TypeEntry> = Arc::new(array_type());
    static ref CALLABLE_TYPE: Arc<TypeEntry> = Arc::new(callable_type());
    static ref PREDICATE_TYPE: Arc<TypeEntry> = Arc::new(predicate_type());
    static ref COMPARATOR_TYPE: Arc<TypeEntry> = Arc::new(comparator_type());
    static ref MATCHER_TYPE: Arc<TypeEntry> = Arc::new(matcher_type());
}

/// The universal base type.
pub fn object() -> Arc<TypeEntry> {
    Arc::clone(&OBJECT_TYPE)
}

pub fn string() -> Arc<TypeEntry> {
    Arc::clone(&STRING_TYPE)
}

/// Descriptor of a boxed scalar kind.
pub fn boxed(kind: PrimitiveKind) -> Arc<TypeEntry> {
    let index = PrimitiveKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default();
    Arc::clone(&BOXED_TYPES[index])
}

pub fn array() -> Arc<TypeEntry> {
    Arc::clone(&ARRAY_TYPE)
}

pub fn callable() -> Arc<TypeEntry> {
    Arc::clone(&CALLABLE_TYPE)
}

pub fn predicate() -> Arc<TypeEntry> {
    Arc::clone(&PREDICATE_TYPE)
}

/// The comparator contract: `compare(Object, Object) -> Integer`.
pub fn comparator() -> Arc<TypeEntry> {
    Arc::clone(&COMPARATOR_TYPE)
}

/// The matcher base type: `matches(Object) -> Boolean`.
pub fn matcher() -> Arc<TypeEntry> {
    Arc::clone(&MATCHER_TYPE)
}

/// Every builtin descriptor.
pub fn all() -> Vec<Arc<TypeEntry>> {
    let mut types = vec![object(), string()];
    types.extend(BOXED_TYPES.iter().cloned());
    types.extend([array(), callable(), predicate(), comparator(), matcher()]);
    types
}

/// Descriptor members of a non-object value are looked up on.
pub fn descriptor_for(value: &Value) -> Option<Arc<TypeEntry>> {
    if let Some(kind) = value.scalar_kind() {
        return Some(boxed(kind));
    }
    match value {
        Value::String(_) => Some(string()),
        Value::Array(_) => Some(array()),
        Value::Callable(_) => Some(callable()),
        Value::Predicate(_) => Some(predicate()),
        Value::Object(object) => Some(Arc::clone(object.type_entry())),
        _ => None,
    }
}

fn boolean() -> TypeRef {
    TypeRef::boxed(PrimitiveKind::Bool)
}

fn integer() -> TypeRef {
    TypeRef::boxed(PrimitiveKind::Int32)
}

fn method<F>(name: &str, params: Vec<TypeRef>, return_type: TypeRef, f: F) -> MethodEntry
where
    F: Fn(&mut CallContext) -> Result<(), NativeError> + Send + Sync + 'static,
{
    MethodEntry::new(MethodDef::new(name, params, return_type), NativeFn::new(f))
}

fn ordering_value(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn compare_this(ctx: &mut CallContext) -> Result<(), NativeError> {
    let other = ctx.arg_slot(0)?;
    let ordering = compare_natural(ctx.this(), other).ok_or_else(|| {
        NativeError::other(format!(
            "{} is not comparable to {}",
            ctx.this().type_name(),
            other.type_name()
        ))
    })?;
    ctx.set_return(ordering_value(ordering));
    Ok(())
}

fn object_type() -> TypeEntry {
    TypeEntry::new(OBJECT, TypeKind::Class)
        .with_method(method("equals", vec![TypeRef::Any], boolean(), |ctx: &mut CallContext| {
            let equal = ctx.this() == ctx.arg_slot(0)?;
            ctx.set_return(equal);
            Ok(())
        }))
        .with_method(method("hash_code", vec![], integer(), |ctx: &mut CallContext| {
            let hash = ctx.this().hash_code();
            ctx.set_return(hash);
            Ok(())
        }))
        .with_method(method("to_string", vec![], TypeRef::String, |ctx: &mut CallContext| {
            let text = ctx.this().to_string();
            ctx.set_return(text);
            Ok(())
        }))
        .finish()
}

fn this_str(ctx: &CallContext) -> Result<Rc<str>, NativeError> {
    match ctx.this() {
        Value::String(s) => Ok(Rc::clone(s)),
        other => Err(NativeError::invalid_this(format!(
            "expected a String, got {}",
            other.type_name()
        ))),
    }
}

fn string_type() -> TypeEntry {
    TypeEntry::new("String", TypeKind::Class)
        .with_base(object())
        .with_method(method("length", vec![], integer(), |ctx: &mut CallContext| {
            let len = this_str(ctx)?.chars().count();
            ctx.set_return(i32::try_from(len).unwrap_or(i32::MAX));
            Ok(())
        }))
        .with_method(method("is_empty", vec![], boolean(), |ctx: &mut CallContext| {
            let empty = this_str(ctx)?.is_empty();
            ctx.set_return(empty);
            Ok(())
        }))
        .with_method(method("to_upper_case", vec![], TypeRef::String, |ctx: &mut CallContext| {
            let upper = this_str(ctx)?.to_uppercase();
            ctx.set_return(upper);
            Ok(())
        }))
        .with_method(method("to_lower_case", vec![], TypeRef::String, |ctx: &mut CallContext| {
            let lower = this_str(ctx)?.to_lowercase();
            ctx.set_return(lower);
            Ok(())
        }))
        .with_method(method("concat", vec![TypeRef::String], TypeRef::String, |ctx: &mut CallContext| {
            let suffix: String = ctx.arg(0)?;
            let joined = format!("{}{suffix}", this_str(ctx)?);
            ctx.set_return(joined);
            Ok(())
        }))
        .with_method(method("starts_with", vec![TypeRef::String], boolean(), |ctx: &mut CallContext| {
            let prefix: String = ctx.arg(0)?;
            let starts = this_str(ctx)?.starts_with(prefix.as_str());
            ctx.set_return(starts);
            Ok(())
        }))
        .with_method(method("contains", vec![TypeRef::String], boolean(), |ctx: &mut CallContext| {
            let needle: String = ctx.arg(0)?;
            let found = this_str(ctx)?.contains(needle.as_str());
            ctx.set_return(found);
            Ok(())
        }))
        .with_method(method("compare_to", vec![TypeRef::String], integer(), compare_this))
        .finish()
}

fn boxed_type(kind: PrimitiveKind) -> TypeEntry {
    TypeEntry::new(kind.boxed_name(), TypeKind::Class)
        .with_base(object())
        .with_method(method(
            "compare_to",
            vec![TypeRef::boxed(kind)],
            integer(),
            compare_this,
        ))
        .finish()
}

fn array_type() -> TypeEntry {
    TypeEntry::new("Array", TypeKind::Class)
        .with_base(object())
        .with_method(method("length", vec![], integer(), |ctx: &mut CallContext| {
            let array = this_array(ctx)?;
            ctx.set_return(i32::try_from(array.len()).unwrap_or(i32::MAX));
            Ok(())
        }))
        .with_method(method("get", vec![integer()], TypeRef::Any, |ctx: &mut CallContext| {
            let index: i32 = ctx.arg(0)?;
            let array = this_array(ctx)?;
            let item = usize::try_from(index)
                .ok()
                .and_then(|i| array.get(i))
                .ok_or_else(|| {
                    NativeError::other(format!("index {index} out of bounds for length {}", array.len()))
                })?;
            ctx.set_return_slot(item);
            Ok(())
        }))
        .finish()
}

fn this_array(ctx: &CallContext) -> Result<ArrayRef, NativeError> {
    ctx.this().as_array().cloned().ok_or_else(|| {
        NativeError::invalid_this(format!("expected an array, got {}", ctx.this().type_name()))
    })
}

fn variadic_any() -> Vec<TypeRef> {
    vec![TypeRef::array_of(TypeRef::Any)]
}

fn callable_type() -> TypeEntry {
    let call = MethodDef::new("call", variadic_any(), TypeRef::Any).variadic();
    TypeEntry::new("Callable", TypeKind::Class)
        .with_base(object())
        .with_method(MethodEntry::new(
            call,
            NativeFn::new(|ctx: &mut CallContext| {
                let callable = match ctx.this() {
                    Value::Callable(callable) => callable.clone(),
                    Value::Predicate(predicate) => predicate.to_callable(),
                    other => {
                        return Err(NativeError::invalid_this(format!(
                            "expected a Callable, got {}",
                            other.type_name()
                        )));
                    }
                };
                let args = ctx.arg::<ArrayRef>(0)?.to_vec();
                let result = callable.call(&args)?;
                ctx.set_return_slot(result);
                Ok(())
            }),
        ))
        .finish()
}

fn this_predicate(ctx: &CallContext) -> Result<Predicate, NativeError> {
    match ctx.this() {
        Value::Predicate(predicate) => Ok(predicate.clone()),
        other => Err(NativeError::invalid_this(format!(
            "expected a Predicate, got {}",
            other.type_name()
        ))),
    }
}

fn predicate_type() -> TypeEntry {
    let eval = MethodDef::new("eval", variadic_any(), boolean()).variadic();
    TypeEntry::new("Predicate", TypeKind::Class)
        .with_base(callable())
        .with_method(MethodEntry::new(
            eval,
            NativeFn::new(|ctx: &mut CallContext| {
                let predicate = this_predicate(ctx)?;
                let args = ctx.arg::<ArrayRef>(0)?.to_vec();
                let result = predicate.eval(&args)?;
                ctx.set_return(result);
                Ok(())
            }),
        ))
        .with_method(method("negated", vec![], TypeRef::Predicate, |ctx: &mut CallContext| {
            let negated = this_predicate(ctx)?.negated();
            ctx.set_return(negated);
            Ok(())
        }))
        .finish()
}

fn comparator_type() -> TypeEntry {
    TypeEntry::new(COMPARATOR, TypeKind::Interface)
        .with_method(MethodEntry::abstract_entry(MethodDef::new(
            "compare",
            vec![TypeRef::Any, TypeRef::Any],
            integer(),
        )))
        .finish()
}

fn matcher_type() -> TypeEntry {
    TypeEntry::new(MATCHER, TypeKind::Class)
        .with_base(object())
        .with_method(MethodEntry::abstract_entry(MethodDef::new(
            "matches",
            vec![TypeRef::Any],
            boolean(),
        )))
        .finish()
}
