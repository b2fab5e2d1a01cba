//! Error types for every phase of dynamic dispatch.
//!
//! ```text
//! ConversionError    - Value <-> Rust conversions
//! NativeError        - failures raised by a native behavior
//! DispatchError      - resolution, assembly and invocation failures
//! CoercionError      - a value could not be made into a Callable
//! RegistrationError  - building type descriptors
//! MirrorError        - field-level inspection
//! ```

use thiserror::Error;

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors that can occur when converting between Rust and runtime values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Integer overflow during conversion
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i64, target_type: &'static str },

    /// Attempted to convert null to a non-nullable type
    #[error("null cannot be converted to {target_type}")]
    NullValue { target_type: &'static str },
}

// ============================================================================
// Native Errors
// ============================================================================

/// Errors raised by a native behavior while it runs.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Error converting arguments or return values
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Invalid `this` reference for method call
    #[error("invalid 'this' reference: {message}")]
    InvalidThis { message: String },

    /// Argument index out of bounds
    #[error("argument index {index} out of bounds (function has {count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// A nested dispatch made by the behavior failed
    #[error(transparent)]
    Dispatch(Box<DispatchError>),

    /// Generic native error
    #[error("native error: {message}")]
    Other { message: String },
}

impl NativeError {
    /// Create an "invalid this" error with a message.
    pub fn invalid_this(message: impl Into<String>) -> Self {
        NativeError::InvalidThis {
            message: message.into(),
        }
    }

    /// Create a generic native error.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other {
            message: message.into(),
        }
    }
}

impl From<DispatchError> for NativeError {
    fn from(err: DispatchError) -> Self {
        NativeError::Dispatch(Box::new(err))
    }
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// Errors produced by the resolution engine.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No member with the given name and compatible arguments was found.
    #[error("no member '{name}' on '{target_type}' accepts ({})", args.join(", "))]
    Resolution {
        name: String,
        target_type: String,
        /// Runtime kind names of the arguments
        args: Vec<String>,
    },

    /// The invocation argument vector could not be built.
    #[error("cannot assemble arguments for '{member}': {detail}")]
    Assembly { member: String, detail: String },

    /// The member exists but cannot be called.
    #[error("access denied to '{type_name}.{member}': {reason}")]
    AccessDenied {
        member: String,
        type_name: String,
        reason: String,
    },

    /// The invoked behavior itself failed.
    #[error(transparent)]
    Target(NativeError),

    /// A name-bound callable was invoked without a target argument.
    #[error("method name '{name}' invoked without a target")]
    MissingTarget { name: String },

    /// A predicate's underlying callable returned something other than a boolean.
    #[error("predicate returned {actual}, expected Boolean")]
    PredicateType { actual: String },

    /// Checked narrowing of a result failed.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A value could not be coerced to a callable.
    #[error("coercion error: {0}")]
    Coercion(#[from] CoercionError),
}

impl DispatchError {
    /// Wrap a native error, unwrapping nested dispatch failures.
    pub fn from_native(err: NativeError) -> Self {
        match err {
            NativeError::Dispatch(inner) => *inner,
            other => DispatchError::Target(other),
        }
    }

    /// Create an access-denied error.
    pub fn access_denied(
        type_name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DispatchError::AccessDenied {
            member: member.into(),
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an assembly error.
    pub fn assembly(member: impl Into<String>, detail: impl Into<String>) -> Self {
        DispatchError::Assembly {
            member: member.into(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Coercion Errors
// ============================================================================

/// Errors produced while turning an arbitrary value into a callable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Null has no callable interpretation.
    #[error("cannot coerce null to a callable")]
    Null,

    /// The value matches none of the coercion rules.
    #[error("cannot coerce {value} to a callable")]
    Unsupported { value: String },

    /// The value's type exposes several single-method interfaces.
    #[error("ambiguous coercion of '{type_name}': single-method interfaces {}", interfaces.join(", "))]
    Ambiguous {
        type_name: String,
        interfaces: Vec<String>,
    },

    /// A shape to adapt to does not have exactly one non-universal method.
    #[error("'{shape}' has {count} abstract methods, expected exactly 1")]
    NotSingleMethod { shape: String, count: usize },

    /// A detected interface method has no implementation on the type.
    #[error("'{type_name}' does not implement '{method}'")]
    Unbound { type_name: String, method: String },
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while building type descriptors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A variadic method whose last parameter is not an array.
    #[error("variadic method '{type_name}.{method}' must end with an array parameter")]
    InvalidVariadic { type_name: String, method: String },

    /// A concrete class method without a native implementation.
    #[error("method '{type_name}.{method}' has no implementation")]
    MissingImplementation { type_name: String, method: String },

    /// `implements` named a type that is not an interface.
    #[error("'{0}' is not an interface")]
    NotAnInterface(String),

    /// `extends` named a type that is not a class.
    #[error("'{0}' is not a class")]
    NotAClass(String),
}

// ============================================================================
// Mirror Errors
// ============================================================================

/// Errors raised by field-level inspection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MirrorError {
    /// The field does not exist or is not visible at this access level.
    #[error("unknown field '{field}' on '{type_name}'")]
    UnknownField { type_name: String, field: String },
}
