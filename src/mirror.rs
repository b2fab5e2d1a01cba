//! Field-level inspection of objects.

use fluency_core::{DispatchError, FieldEntry, MirrorError, ObjectRef, TypeRef, Value, Visibility};
use fluency_dispatch::Dispatcher;

/// Reads and writes the fields of a value and invokes its members.
///
/// A public mirror sees public fields of the runtime type and its ancestors.
/// A privileged mirror also sees non-public fields declared on the runtime
/// type itself, but never private fields of ancestors.
#[derive(Debug, Clone)]
pub struct Mirror {
    value: Value,
    dispatcher: Dispatcher,
}

impl Mirror {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn privileged(value: Value) -> Self {
        Self {
            value,
            dispatcher: Dispatcher::privileged(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_privileged(&self) -> bool {
        self.dispatcher == Dispatcher::privileged()
    }

    pub fn get(&self, field: &str) -> Result<Value, MirrorError> {
        self.field(field).map(|f| f.value())
    }

    pub fn set(&self, field: &str, value: Value) -> Result<&Self, MirrorError> {
        self.field(field)?.set(value);
        Ok(self)
    }

    /// A handle on a visible field.
    pub fn field(&self, name: &str) -> Result<InstanceField, MirrorError> {
        let Value::Object(object) = &self.value else {
            return Err(MirrorError::UnknownField {
                type_name: self.value.type_name(),
                field: name.to_string(),
            });
        };
        let ty = object.type_entry();
        let privileged = self.is_privileged();
        let entry = ty
            .all_fields()
            .into_iter()
            .find(|(owner, field)| {
                field.name == name
                    && (field.visibility == Visibility::Public
                        || (privileged && owner.type_hash == ty.type_hash))
            })
            .map(|(_, field)| field.clone())
            .ok_or_else(|| MirrorError::UnknownField {
                type_name: ty.name.clone(),
                field: name.to_string(),
            })?;
        Ok(InstanceField {
            object: object.clone(),
            entry,
        })
    }

    /// Invoke a member at this mirror's access level.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, DispatchError> {
        self.dispatcher.resolve_and_invoke(&self.value, name, args)
    }
}

/// A field of a particular object.
#[derive(Debug, Clone)]
pub struct InstanceField {
    object: ObjectRef,
    entry: FieldEntry,
}

impl InstanceField {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.entry.ty
    }

    pub fn visibility(&self) -> Visibility {
        self.entry.visibility
    }

    pub fn value(&self) -> Value {
        self.object.field(&self.entry.name).unwrap_or(Value::Null)
    }

    pub fn set(&self, value: Value) {
        self.object.set_field(&self.entry.name, value);
    }
}
