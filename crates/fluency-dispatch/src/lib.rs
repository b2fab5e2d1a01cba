//! The resolution engine.
//!
//! Given a runtime value, a member name and argument values, finds the member
//! of the value's runtime type that best matches and invokes it:
//!
//! ```text
//! compat::accepts -> scan::scan -> resolver::resolve -> assemble::assemble -> invoker::invoke
//! ```
//!
//! # Example
//!
//! ```
//! use fluency_core::Value;
//! use fluency_dispatch::resolve_and_invoke;
//!
//! let len = resolve_and_invoke(&Value::string("hello"), "length", &[]).unwrap();
//! assert_eq!(len, Value::Int32(5));
//! ```

pub mod assemble;
pub mod closures;
pub mod compat;
mod dispatcher;
pub mod invoker;
pub mod resolver;
pub mod scan;

pub use closures::{BoundMethod, ImplementedMethod, MethodName};
pub use compat::{accepts, type_assignable};
pub use dispatcher::{Dispatcher, resolve_and_invoke};
pub use resolver::{Candidate, MatchKind, VarArgsMode};
pub use scan::{Access, Candidates, MemberDescriptor};
