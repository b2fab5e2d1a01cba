//! Invocation argument assembly.

use fluency_core::{ArrayRef, DispatchError, Value};

use crate::compat::accepts;
use crate::resolver::{Candidate, MatchKind, VarArgsMode};

/// Build the argument vector the selected member is invoked with.
///
/// A passed-through array keeps its storage; a wrapped tail becomes a new
/// array of the variadic element kind.
pub fn assemble(candidate: &Candidate<'_>, args: &[Value]) -> Result<Vec<Value>, DispatchError> {
    match candidate.kind {
        MatchKind::Fixed | MatchKind::VarArgs(VarArgsMode::PassThrough) => Ok(args.to_vec()),
        MatchKind::VarArgs(VarArgsMode::Wrap) => wrap_tail(candidate, args),
    }
}

fn wrap_tail(candidate: &Candidate<'_>, args: &[Value]) -> Result<Vec<Value>, DispatchError> {
    let member = &candidate.member;
    let element = member
        .params
        .last()
        .and_then(|tail| tail.element())
        .ok_or_else(|| {
            DispatchError::assembly(member.qualified_name(), "member has no variadic tail")
        })?;
    let leading = member.params.len() - 1;
    if args.len() < leading {
        return Err(DispatchError::assembly(
            member.qualified_name(),
            format!("expected at least {leading} arguments, got {}", args.len()),
        ));
    }

    let (head, trailing) = args.split_at(leading);
    for (position, value) in trailing.iter().enumerate() {
        if !accepts(element, value) {
            return Err(DispatchError::assembly(
                member.qualified_name(),
                format!(
                    "variadic element {position} is {}, expected {element}",
                    value.type_name()
                ),
            ));
        }
    }

    let mut assembled = head.to_vec();
    assembled.push(Value::Array(ArrayRef::new(element.clone(), trailing.to_vec())));
    Ok(assembled)
}
