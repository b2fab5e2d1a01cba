//! Candidate scan over a runtime type and its ancestors.

use fluency_core::{MethodEntry, TypeEntry, TypeHash, TypeRef, Visibility};
use tracing::trace;

/// Which members a dispatch may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    /// Public members only.
    #[default]
    Public,
    /// Also non-public members of the runtime type itself, and non-private
    /// members of its ancestors.
    Privileged,
}

impl Access {
    fn admits(self, visibility: Visibility, depth: usize) -> bool {
        match self {
            Access::Public => visibility == Visibility::Public,
            Access::Privileged => depth == 0 || visibility != Visibility::Private,
        }
    }
}

/// A named member found by the scan.
#[derive(Debug, Clone, Copy)]
pub struct MemberDescriptor<'a> {
    pub name: &'a str,
    pub params: &'a [TypeRef],
    pub variadic: bool,
    pub method: &'a MethodEntry,
    /// Type declaring the member.
    pub owner: &'a TypeEntry,
}

impl<'a> MemberDescriptor<'a> {
    pub fn new(method: &'a MethodEntry, owner: &'a TypeEntry) -> Self {
        Self {
            name: method.name(),
            params: method.params(),
            variadic: method.is_variadic(),
            method,
            owner,
        }
    }

    /// `Owner.name`, for error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner.name, self.name)
    }
}

/// Members matching a name, split by arity class.
#[derive(Debug, Default)]
pub struct Candidates<'a> {
    /// Fixed-arity members, scan order.
    pub fixed: Vec<MemberDescriptor<'a>>,
    /// Variadic members, scan order.
    pub variadic: Vec<MemberDescriptor<'a>>,
    /// Members with the name that the access level excludes.
    pub hidden: Vec<MemberDescriptor<'a>>,
}

impl<'a> Candidates<'a> {
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.variadic.is_empty()
    }

    /// The hidden members as their own candidate set.
    pub fn hidden_candidates(&self) -> Candidates<'a> {
        let (variadic, fixed): (Vec<_>, Vec<_>) =
            self.hidden.iter().copied().partition(|m| m.variadic);
        Candidates {
            fixed,
            variadic,
            hidden: Vec::new(),
        }
    }
}

/// Collect members named `name` on `target` and its base classes, most
/// derived first. Overridden members are skipped.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn scan<'a>(target: &'a TypeEntry, name: &str, access: Access) -> Candidates<'a> {
    let mut candidates = Candidates::default();
    // Signature hashes ignore the owner, so an override shadows its base.
    let mut seen: Vec<TypeHash> = Vec::new();

    for (depth, ty) in target.ancestors().enumerate() {
        for method in ty.methods.iter().filter(|m| m.name() == name) {
            let signature = method.def.signature_hash();
            if seen.contains(&signature) {
                continue;
            }
            seen.push(signature);

            let member = MemberDescriptor::new(method, ty);
            if !access.admits(method.visibility(), depth) {
                candidates.hidden.push(member);
            } else if member.variadic {
                candidates.variadic.push(member);
            } else {
                candidates.fixed.push(member);
            }
        }
    }

    trace!(
        target_type = %target.name,
        name,
        fixed = candidates.fixed.len(),
        variadic = candidates.variadic.len(),
        hidden = candidates.hidden.len(),
        "scanned candidates"
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluency_core::{CallContext, NativeError, PrimitiveKind};
    use fluency_registry::TypeRegistry;

    fn int() -> TypeRef {
        TypeRef::boxed(PrimitiveKind::Int32)
    }

    fn noop(_: &mut CallContext) -> Result<(), NativeError> {
        Ok(())
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class("Base")
            .method("inc", vec![int()], int(), noop)
            .method("inc", vec![int(), int()], int(), noop)
            .variadic_method("inc", vec![int(), TypeRef::array_of(int())], int(), noop)
            .private_method("secret", vec![], int(), noop)
            .protected_method("shared", vec![], int(), noop)
            .method("other", vec![], int(), noop)
            .build()
            .unwrap();
        registry
            .register_class("Derived")
            .extends("Base")
            .method("inc", vec![int()], int(), noop)
            .private_method("own", vec![], int(), noop)
            .build()
            .unwrap();
        registry
    }

    #[test]
    fn partitions_by_variadic_flag() {
        let registry = registry();
        let base = registry.get_type("Base").unwrap();
        let candidates = scan(base, "inc", Access::Public);
        assert_eq!(candidates.fixed.len(), 2);
        assert_eq!(candidates.variadic.len(), 1);
        assert!(candidates.hidden.is_empty());
    }

    #[test]
    fn overrides_resolve_to_most_derived() {
        let registry = registry();
        let derived = registry.get_type("Derived").unwrap();
        let candidates = scan(derived, "inc", Access::Public);
        assert_eq!(candidates.fixed.len(), 2);
        assert_eq!(candidates.fixed[0].owner.name, "Derived");
        assert_eq!(candidates.fixed[1].owner.name, "Base");
        assert_eq!(candidates.fixed[0].qualified_name(), "Derived.inc");
    }

    #[test]
    fn same_arity_overloads_are_not_shadowed() {
        let mut registry = registry();
        registry
            .register_class("Sibling")
            .extends("Base")
            .method("inc", vec![TypeRef::String], int(), noop)
            .build()
            .unwrap();
        let sibling = registry.get_type("Sibling").unwrap();
        let candidates = scan(sibling, "inc", Access::Public);
        let owners: Vec<_> = candidates.fixed.iter().map(|m| m.owner.name.as_str()).collect();
        assert_eq!(owners, vec!["Sibling", "Base", "Base"]);
    }

    #[test]
    fn inherited_members_are_included() {
        let registry = registry();
        let derived = registry.get_type("Derived").unwrap();
        let candidates = scan(derived, "other", Access::Public);
        assert_eq!(candidates.fixed.len(), 1);
        let universal = scan(derived, "to_string", Access::Public);
        assert_eq!(universal.fixed[0].owner.name, "Object");
    }

    #[test]
    fn public_access_hides_non_public() {
        let registry = registry();
        let derived = registry.get_type("Derived").unwrap();
        let own = scan(derived, "own", Access::Public);
        assert!(own.is_empty());
        assert_eq!(own.hidden.len(), 1);
        assert_eq!(own.hidden_candidates().fixed.len(), 1);
    }

    #[test]
    fn privileged_access_rules() {
        let registry = registry();
        let derived = registry.get_type("Derived").unwrap();
        assert_eq!(scan(derived, "own", Access::Privileged).fixed.len(), 1);
        // Protected members of ancestors are visible, private ones are not.
        assert_eq!(scan(derived, "shared", Access::Privileged).fixed.len(), 1);
        let secret = scan(derived, "secret", Access::Privileged);
        assert!(secret.is_empty());
        assert_eq!(secret.hidden.len(), 1);
        // The declaring type sees its own private members.
        let base = registry.get_type("Base").unwrap();
        assert_eq!(scan(base, "secret", Access::Privileged).fixed.len(), 1);
    }

    #[test]
    fn unknown_name_is_empty() {
        let registry = registry();
        let base = registry.get_type("Base").unwrap();
        let candidates = scan(base, "doesNotExist", Access::Privileged);
        assert!(candidates.is_empty());
        assert!(candidates.hidden.is_empty());
    }
}
