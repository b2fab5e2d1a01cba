//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash identifying a type or a method signature.
//! Hashes are computed from names (and parameter hashes for signatures), so
//! the same name always yields the same identity regardless of registration
//! order.
//!
//! # Examples
//!
//! ```
//! use fluency_core::TypeHash;
//!
//! let counter = TypeHash::from_name("Counter");
//! assert_eq!(counter, TypeHash::from_name("Counter"));
//!
//! let int_hash = TypeHash::from_name("Integer");
//! let a = TypeHash::from_signature("inc", &[int_hash]);
//! let b = TypeHash::from_signature("inc", &[int_hash, int_hash]);
//! assert_ne!(a, b);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for combining components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method signature hashes.
    pub const SIGNATURE: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for array type hashes.
    pub const ARRAY: u64 = 0x3e9f5d2a8c7b1403;

    /// Parameter position mixing constants, so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a type or a method signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of an array type from its element hash.
    #[inline]
    pub fn from_array(element: TypeHash) -> Self {
        TypeHash(
            hash_constants::ARRAY
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(element.0),
        )
    }

    /// Create a signature hash from a method name and its parameter hashes.
    ///
    /// The owning type is not part of the hash, so an override in a subclass
    /// produces the same signature hash as the member it overrides.
    #[inline]
    pub fn from_signature(name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::SIGNATURE ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps parameter order significant (XOR alone would not)
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_hash_determinism() {
        assert_eq!(TypeHash::from_name("Counter"), TypeHash::from_name("Counter"));
        assert_ne!(TypeHash::from_name("Counter"), TypeHash::from_name("Adder"));
    }

    #[test]
    fn signature_hash_parameter_order_matters() {
        let int_hash = TypeHash::from_name("Integer");
        let str_hash = TypeHash::from_name("String");
        let a = TypeHash::from_signature("f", &[int_hash, str_hash]);
        let b = TypeHash::from_signature("f", &[str_hash, int_hash]);
        assert_ne!(a, b);
    }

    #[test]
    fn signature_hash_differs_from_type_hash() {
        assert_ne!(TypeHash::from_name("run"), TypeHash::from_signature("run", &[]));
    }

    #[test]
    fn array_hash_depends_on_element() {
        let ints = TypeHash::from_array(TypeHash::from_name("Integer"));
        let strings = TypeHash::from_array(TypeHash::from_name("String"));
        assert_ne!(ints, strings);
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("x").is_empty());
    }
}
