//! Runtime values.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{Callable, Predicate, PrimitiveKind, TypeEntry, TypeHash, TypeRef, builtins};

/// A runtime value.
///
/// Only the dynamic kind of a value is known. Scalars report their boxed
/// kind (`Int32` is an `Integer`), reference values carry identity and are
/// shared on clone.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value
    Null,
    Bool(bool),
    Char(char),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    /// Immutable shared string
    String(Rc<str>),
    /// Shared array with a declared element kind
    Array(ArrayRef),
    /// Instance of a registered type
    Object(ObjectRef),
    /// Anything satisfying the callable contract
    Callable(Callable),
    /// Anything satisfying the predicate contract
    Predicate(Predicate),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a fresh array value.
    pub fn array(element: TypeRef, items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::new(element, items))
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of a scalar value.
    pub fn scalar_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Bool),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Int8(_) => Some(PrimitiveKind::Int8),
            Value::Int16(_) => Some(PrimitiveKind::Int16),
            Value::Int32(_) => Some(PrimitiveKind::Int32),
            Value::Int64(_) => Some(PrimitiveKind::Int64),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    /// The runtime kind of this value, `None` for `Null`.
    pub fn runtime_kind(&self) -> Option<TypeRef> {
        if let Some(kind) = self.scalar_kind() {
            return Some(TypeRef::Boxed(kind));
        }
        match self {
            Value::Null => None,
            Value::String(_) => Some(TypeRef::String),
            Value::Array(array) => Some(TypeRef::array_of(array.element().clone())),
            Value::Object(object) => Some(TypeRef::Named {
                hash: object.type_hash(),
                name: object.type_name().to_string(),
            }),
            Value::Callable(_) => Some(TypeRef::Callable),
            Value::Predicate(_) => Some(TypeRef::Predicate),
            _ => None,
        }
    }

    /// Name of the runtime kind (`Integer`, `String[]`, `null`).
    pub fn type_name(&self) -> String {
        self.runtime_kind()
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "null".to_string())
    }

    /// The type descriptor members are looked up on, `None` for `Null`.
    pub fn type_entry(&self) -> Option<Arc<TypeEntry>> {
        match self {
            Value::Null => None,
            Value::Object(object) => Some(Arc::clone(object.type_entry())),
            other => builtins::descriptor_for(other),
        }
    }

    /// Boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral payload widened to `i64`, if this is an integral scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`, if this is a numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// String payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Identity-based hash for reference values, value-based for scalars.
    pub fn hash_code(&self) -> i32 {
        fn fold(bits: u64) -> i32 {
            (bits ^ (bits >> 32)) as i32
        }
        match self {
            Value::Null => 0,
            Value::Bool(b) => {
                if *b {
                    1231
                } else {
                    1237
                }
            }
            Value::Char(c) => *c as i32,
            Value::Int8(v) => i32::from(*v),
            Value::Int16(v) => i32::from(*v),
            Value::Int32(v) => *v,
            Value::Int64(v) => fold(*v as u64),
            Value::Float(v) => v.to_bits() as i32,
            Value::Double(v) => fold(v.to_bits()),
            Value::String(s) => s
                .chars()
                .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32)),
            Value::Array(array) => fold(array.identity() as u64),
            Value::Object(object) => fold(object.identity() as u64),
            Value::Callable(callable) => fold(callable.identity() as u64),
            Value::Predicate(predicate) => fold(predicate.identity() as u64),
        }
    }
}

/// Natural ordering of numbers, strings, chars and booleans.
///
/// Integral scalars compare exactly, mixed numeric kinds through `f64`.
/// Returns `None` for values without a natural order (including NaN).
pub fn compare_natural(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Char(x), Value::Char(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::Int8(v) => write!(f, "Int8({v})"),
            Value::Int16(v) => write!(f, "Int16({v})"),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::Int64(v) => write!(f, "Int64({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Array(array) => write!(f, "Array({:?})", &*array.items()),
            Value::Object(object) => write!(f, "Object({object:?})"),
            Value::Callable(callable) => write!(f, "Callable({callable})"),
            Value::Predicate(predicate) => write!(f, "Predicate({predicate})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(array) => {
                write!(f, "[")?;
                for (i, item) in array.items().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "{}@{:x}", object.type_name(), object.identity()),
            Value::Callable(callable) => write!(f, "{callable}"),
            Value::Predicate(predicate) => write!(f, "{predicate}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a == b,
            (Value::Predicate(a), Value::Predicate(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<Predicate> for Value {
    fn from(predicate: Predicate) -> Self {
        Value::Predicate(predicate)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<ArrayRef> for Value {
    fn from(array: ArrayRef) -> Self {
        Value::Array(array)
    }
}

/// A shared, mutable array with a declared element kind.
///
/// Clones share storage; use [`ArrayRef::ptr_eq`] to observe identity.
#[derive(Clone)]
pub struct ArrayRef {
    element: TypeRef,
    items: Rc<RefCell<Vec<Value>>>,
}

impl ArrayRef {
    pub fn new(element: TypeRef, items: Vec<Value>) -> Self {
        Self {
            element,
            items: Rc::new(RefCell::new(items)),
        }
    }

    /// Declared element kind.
    pub fn element(&self) -> &TypeRef {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Element at `index`, cloned out of the array.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Replace the element at `index`. Returns false if out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    /// Borrow the elements.
    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        self.items.borrow()
    }

    /// Copy the elements out.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Whether both refer to the same storage.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.items) as *const () as usize
    }
}

/// A reference to an instance of a registered type.
///
/// Holds the runtime type descriptor, dynamic field slots, and an optional
/// native Rust payload that native methods reach through `this`.
#[derive(Clone)]
pub struct ObjectRef {
    ty: Arc<TypeEntry>,
    state: Rc<ObjectState>,
}

struct ObjectState {
    fields: RefCell<FxHashMap<String, Value>>,
    native: Option<RefCell<Box<dyn Any>>>,
}

impl ObjectRef {
    /// Instantiate `ty` with every declared field (own and inherited) set to `Null`.
    pub fn new(ty: Arc<TypeEntry>) -> Self {
        Self::build(ty, None)
    }

    /// Instantiate `ty` carrying a native payload.
    pub fn with_native<T: Any>(ty: Arc<TypeEntry>, native: T) -> Self {
        Self::build(ty, Some(RefCell::new(Box::new(native) as Box<dyn Any>)))
    }

    fn build(ty: Arc<TypeEntry>, native: Option<RefCell<Box<dyn Any>>>) -> Self {
        let mut fields = FxHashMap::default();
        for (_, field) in ty.all_fields() {
            fields.entry(field.name.clone()).or_insert(Value::Null);
        }
        Self {
            ty,
            state: Rc::new(ObjectState {
                fields: RefCell::new(fields),
                native,
            }),
        }
    }

    /// Runtime type descriptor.
    pub fn type_entry(&self) -> &Arc<TypeEntry> {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        &self.ty.name
    }

    pub fn type_hash(&self) -> TypeHash {
        self.ty.type_hash
    }

    /// Current value of a field slot.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.state.fields.borrow().get(name).cloned()
    }

    /// Overwrite a field slot. Returns false if the type has no such field.
    pub fn set_field(&self, name: &str, value: Value) -> bool {
        match self.state.fields.borrow_mut().get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Borrow the native payload as `T`.
    pub fn native<T: Any>(&self) -> Option<Ref<'_, T>> {
        let cell = self.state.native.as_ref()?;
        let borrowed = cell.try_borrow().ok()?;
        Ref::filter_map(borrowed, |b| b.downcast_ref::<T>()).ok()
    }

    /// Mutably borrow the native payload as `T`.
    pub fn native_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        let cell = self.state.native.as_ref()?;
        let borrowed = cell.try_borrow_mut().ok()?;
        RefMut::filter_map(borrowed, |b| b.downcast_mut::<T>()).ok()
    }

    /// Whether both refer to the same instance.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.state) as *const () as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type", &self.ty.name)
            .field("fields", &self.state.fields.borrow().len())
            .field("native", &self.state.native.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldEntry, TypeKind, Visibility};

    fn point_type() -> Arc<TypeEntry> {
        let mut entry = TypeEntry::new("Point", TypeKind::Class);
        entry.fields.push(FieldEntry::new("x", TypeRef::boxed(PrimitiveKind::Int32), Visibility::Public));
        entry.fields.push(FieldEntry::new("y", TypeRef::boxed(PrimitiveKind::Int32), Visibility::Private));
        Arc::new(entry.finish())
    }

    #[test]
    fn scalar_runtime_kind_is_boxed() {
        assert_eq!(
            Value::Int32(1).runtime_kind(),
            Some(TypeRef::Boxed(PrimitiveKind::Int32))
        );
        assert_eq!(Value::Int32(1).type_name(), "Integer");
        assert_eq!(Value::Null.runtime_kind(), None);
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn array_runtime_kind_and_display() {
        let array = Value::array(
            TypeRef::boxed(PrimitiveKind::Int32),
            vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)],
        );
        assert_eq!(array.type_name(), "Integer[]");
        assert_eq!(array.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn arrays_compare_by_identity() {
        let a = ArrayRef::new(TypeRef::Any, vec![Value::Int32(1)]);
        let b = ArrayRef::new(TypeRef::Any, vec![Value::Int32(1)]);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert_ne!(Value::Array(a), Value::Array(b));
    }

    #[test]
    fn array_set_and_push_share_storage() {
        let a = ArrayRef::new(TypeRef::Any, vec![Value::Int32(1)]);
        let alias = a.clone();
        assert!(alias.set(0, Value::Int32(5)));
        alias.push(Value::Int32(6));
        assert_eq!(a.to_vec(), vec![Value::Int32(5), Value::Int32(6)]);
        assert!(!a.set(9, Value::Null));
    }

    #[test]
    fn scalars_compare_by_value() {
        assert_eq!(Value::Int32(3), Value::Int32(3));
        assert_ne!(Value::Int32(3), Value::Int64(3));
        assert_eq!(Value::string("a"), Value::from("a"));
    }

    #[test]
    fn object_fields_start_null() {
        let point = ObjectRef::new(point_type());
        assert_eq!(point.field("x"), Some(Value::Null));
        assert!(point.set_field("x", Value::Int32(4)));
        assert_eq!(point.field("x"), Some(Value::Int32(4)));
        assert!(!point.set_field("z", Value::Int32(4)));
        assert_eq!(point.field("z"), None);
    }

    #[test]
    fn object_native_payload() {
        let counter = ObjectRef::with_native(point_type(), 41i32);
        *counter.native_mut::<i32>().unwrap() += 1;
        assert_eq!(*counter.native::<i32>().unwrap(), 42);
        assert!(counter.native::<String>().is_none());
    }

    #[test]
    fn object_display_uses_type_name() {
        let point = Value::Object(ObjectRef::new(point_type()));
        assert!(point.to_string().starts_with("Point@"));
        assert_eq!(point.type_name(), "Point");
    }

    #[test]
    fn natural_ordering() {
        assert_eq!(compare_natural(&Value::Int32(1), &Value::Int64(2)), Some(Ordering::Less));
        assert_eq!(compare_natural(&Value::Double(2.5), &Value::Int32(2)), Some(Ordering::Greater));
        assert_eq!(compare_natural(&Value::string("b"), &Value::string("a")), Some(Ordering::Greater));
        assert_eq!(compare_natural(&Value::string("a"), &Value::Int32(1)), None);
        assert_eq!(compare_natural(&Value::Null, &Value::Null), None);
    }

    #[test]
    fn string_hash_code_is_stable() {
        assert_eq!(Value::string("ab").hash_code(), 97 * 31 + 98);
        assert_eq!(Value::Bool(true).hash_code(), 1231);
    }
}
