//! Type registration for the fluency dispatch engine.
//!
//! [`TypeRegistry`] stores type descriptors by name and hash. Classes and
//! interfaces are registered through the fluent [`ClassBuilder`] and
//! [`InterfaceBuilder`] APIs.

mod class_builder;
mod registry;

pub use class_builder::{ClassBuilder, InterfaceBuilder};
pub use registry::TypeRegistry;
