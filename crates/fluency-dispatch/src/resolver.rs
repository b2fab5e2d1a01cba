//! Overload resolution over scanned candidates.
//!
//! ## Algorithm
//!
//! 1. The first fixed-arity member whose parameter count equals the argument
//!    count and whose parameters each accept their argument wins.
//! 2. Otherwise the first variadic member whose leading parameters accept the
//!    leading arguments, and whose tail is either a single passed array
//!    (checked first) or a run of element-compatible values, wins.
//! 3. Otherwise there is no match.
//!
//! Within a class the first qualifying member in scan order is chosen; there
//! is no specificity ranking.

use fluency_core::Value;
use tracing::trace;

use crate::compat::accepts;
use crate::scan::{Candidates, MemberDescriptor};

/// How a variadic tail is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarArgsMode {
    /// A single trailing array is passed as the tail itself.
    PassThrough,
    /// Trailing arguments are collected into a new array.
    Wrap,
}

/// Which precedence class a candidate matched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Fixed,
    VarArgs(VarArgsMode),
}

/// A member selected for invocation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub member: MemberDescriptor<'a>,
    pub kind: MatchKind,
}

/// Select the member to invoke for `args`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve<'a>(candidates: &Candidates<'a>, args: &[Value]) -> Option<Candidate<'a>> {
    if let Some(member) = candidates.fixed.iter().find(|m| is_fixed_match(m, args)) {
        trace!(member = member.name, owner = %member.owner.name, "fixed-arity match");
        return Some(Candidate {
            member: *member,
            kind: MatchKind::Fixed,
        });
    }

    candidates.variadic.iter().find_map(|member| {
        let mode = varargs_match(member, args)?;
        trace!(member = member.name, owner = %member.owner.name, ?mode, "variadic match");
        Some(Candidate {
            member: *member,
            kind: MatchKind::VarArgs(mode),
        })
    })
}

/// Parameter count equals argument count and each parameter accepts its argument.
pub fn is_fixed_match(member: &MemberDescriptor<'_>, args: &[Value]) -> bool {
    member.params.len() == args.len()
        && member
            .params
            .iter()
            .zip(args)
            .all(|(param, arg)| accepts(param, arg))
}

/// How `args` satisfy a variadic member, if they do.
pub fn varargs_match(member: &MemberDescriptor<'_>, args: &[Value]) -> Option<VarArgsMode> {
    let (tail, leading) = member.params.split_last()?;
    let element = tail.element()?;
    if args.len() < leading.len() {
        return None;
    }
    let (head, trailing) = args.split_at(leading.len());
    if !leading.iter().zip(head).all(|(param, arg)| accepts(param, arg)) {
        return None;
    }

    if let [single] = trailing {
        if matches!(single, Value::Array(_)) && accepts(tail, single) {
            return Some(VarArgsMode::PassThrough);
        }
    }
    if trailing.iter().all(|arg| accepts(element, arg)) {
        return Some(VarArgsMode::Wrap);
    }
    None
}
