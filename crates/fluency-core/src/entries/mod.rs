//! Type descriptor entries.
//!
//! - [`TypeEntry`] - A class or interface with its parents and members
//! - [`MethodEntry`] - A method signature plus its native implementation
//! - [`FieldEntry`] - A declared instance field

mod field;
mod method;
mod type_entry;

pub use field::FieldEntry;
pub use method::{MethodDef, MethodEntry, MethodFlags, UNIVERSAL_METHODS};
pub use type_entry::{Ancestors, TypeEntry, TypeKind};
