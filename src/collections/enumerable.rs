//! Fluent collection operations.
//!
//! Every block argument is an arbitrary [`Value`] coerced through
//! [`coerce_to_callable`] or [`coerce_to_predicate`], so a method name, a
//! native callable, a predicate or a single-method object all work:
//!
//! ```
//! use fluency::prelude::*;
//!
//! let words = Sequence::from(vec![Value::string("b"), Value::string(""), Value::string("a")]);
//! let upper = words.reject(&Value::string("is_empty")).unwrap().map(&Value::string("to_upper_case")).unwrap();
//! assert_eq!(upper.to_vec(), vec![Value::string("B"), Value::string("A")]);
//! ```

use std::cmp::Ordering;

use fluency_core::{ArrayRef, DispatchError, NativeError, TypeRef, Value};

use crate::closures::{coerce_to_callable, coerce_to_predicate};
use crate::collections::comparator::{compare_values, ordering_of};
use crate::collections::lazy::Lazy;

/// An ordered list of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    items: Vec<Value>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.clone()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Copy into a new array with the given element kind.
    pub fn to_array(&self, element: TypeRef) -> ArrayRef {
        ArrayRef::new(element, self.items.clone())
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl From<&ArrayRef> for Sequence {
    fn from(array: &ArrayRef) -> Self {
        Self {
            items: array.to_vec(),
        }
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Enumerable for Sequence {
    fn elements(&self) -> &[Value] {
        &self.items
    }
}

/// Operations over an ordered collection of values.
pub trait Enumerable {
    fn elements(&self) -> &[Value];

    /// The first element satisfying `block`.
    fn detect(&self, block: &Value) -> Result<Option<Value>, DispatchError> {
        let predicate = coerce_to_predicate(block)?;
        for item in self.elements() {
            if predicate.eval(std::slice::from_ref(item))? {
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }

    /// The first element satisfying `block`, or the result of calling
    /// `if_none` with no arguments.
    fn detect_if_none(&self, block: &Value, if_none: &Value) -> Result<Value, DispatchError> {
        match self.detect(block)? {
            Some(found) => Ok(found),
            None => coerce_to_callable(if_none)?.call(&[]),
        }
    }

    fn select(&self, block: &Value) -> Result<Sequence, DispatchError> {
        filter(self.elements(), block, true)
    }

    fn reject(&self, block: &Value) -> Result<Sequence, DispatchError> {
        filter(self.elements(), block, false)
    }

    /// Apply `block` to every element.
    fn map(&self, block: &Value) -> Result<Sequence, DispatchError> {
        let callable = coerce_to_callable(block)?;
        self.elements()
            .iter()
            .map(|item| callable.call(std::slice::from_ref(item)))
            .collect::<Result<Vec<_>, _>>()
            .map(Sequence::from)
    }

    fn collect(&self, block: &Value) -> Result<Sequence, DispatchError> {
        self.map(block)
    }

    fn for_each(&self, block: &Value) -> Result<(), DispatchError> {
        let callable = coerce_to_callable(block)?;
        for item in self.elements() {
            callable.call(std::slice::from_ref(item))?;
        }
        Ok(())
    }

    /// Number of elements satisfying `block`.
    fn count(&self, block: &Value) -> Result<usize, DispatchError> {
        let predicate = coerce_to_predicate(block)?;
        let mut count = 0;
        for item in self.elements() {
            if predicate.eval(std::slice::from_ref(item))? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn any_satisfy(&self, block: &Value) -> Result<bool, DispatchError> {
        Ok(self.detect(block)?.is_some())
    }

    fn all_satisfy(&self, block: &Value) -> Result<bool, DispatchError> {
        let predicate = coerce_to_predicate(block)?;
        for item in self.elements() {
            if !predicate.eval(std::slice::from_ref(item))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn none_satisfy(&self, block: &Value) -> Result<bool, DispatchError> {
        self.any_satisfy(block).map(|any| !any)
    }

    /// Fold from `initial`, calling `block(accumulator, element)`.
    fn inject(&self, initial: Value, block: &Value) -> Result<Value, DispatchError> {
        let callable = coerce_to_callable(block)?;
        self.elements()
            .iter()
            .try_fold(initial, |acc, item| callable.call(&[acc, item.clone()]))
    }

    /// Fold starting from the first element; `None` when empty.
    fn reduce(&self, block: &Value) -> Result<Option<Value>, DispatchError> {
        let callable = coerce_to_callable(block)?;
        let Some((first, rest)) = self.elements().split_first() else {
            return Ok(None);
        };
        rest.iter()
            .try_fold(first.clone(), |acc, item| callable.call(&[acc, item.clone()]))
            .map(Some)
    }

    /// Stable sort with a comparator returning an integer.
    fn sort(&self, comparator: &Value) -> Result<Sequence, DispatchError> {
        let callable = coerce_to_callable(comparator)?;
        let sorted = merge_sort(self.elements().to_vec(), &mut |a: &Value, b: &Value| {
            ordering_of(&callable.call(&[a.clone(), b.clone()])?)
        })?;
        Ok(Sequence::from(sorted))
    }

    /// Stable sort by natural order.
    fn sort_natural(&self) -> Result<Sequence, DispatchError> {
        let sorted = merge_sort(self.elements().to_vec(), &mut |a: &Value, b: &Value| {
            compare_values(a, b).map_err(DispatchError::Target)
        })?;
        Ok(Sequence::from(sorted))
    }

    /// Stable sort by the natural order of `key(element)`.
    fn sort_by(&self, key: &Value) -> Result<Sequence, DispatchError> {
        let keyed = keyed(self.elements(), key)?;
        let sorted = merge_sort(keyed, &mut |(a, _): &(Value, Value), (b, _): &(Value, Value)| {
            compare_values(a, b).map_err(DispatchError::Target)
        })?;
        Ok(sorted.into_iter().map(|(_, item)| item).collect())
    }

    /// The greatest element by natural order, the first one on ties.
    fn max(&self) -> Result<Option<Value>, DispatchError> {
        extreme(self.elements(), Ordering::Greater, |a, b| {
            compare_values(a, b).map_err(DispatchError::Target)
        })
    }

    /// The least element by natural order, the first one on ties.
    fn min(&self) -> Result<Option<Value>, DispatchError> {
        extreme(self.elements(), Ordering::Less, |a, b| {
            compare_values(a, b).map_err(DispatchError::Target)
        })
    }

    /// The greatest element according to `comparator`.
    fn max_with(&self, comparator: &Value) -> Result<Option<Value>, DispatchError> {
        let callable = coerce_to_callable(comparator)?;
        extreme(self.elements(), Ordering::Greater, |a, b| {
            ordering_of(&callable.call(&[a.clone(), b.clone()])?)
        })
    }

    /// The least element according to `comparator`.
    fn min_with(&self, comparator: &Value) -> Result<Option<Value>, DispatchError> {
        let callable = coerce_to_callable(comparator)?;
        extreme(self.elements(), Ordering::Less, |a, b| {
            ordering_of(&callable.call(&[a.clone(), b.clone()])?)
        })
    }

    /// The element with the greatest key, the first one on ties.
    fn max_by(&self, key: &Value) -> Result<Option<Value>, DispatchError> {
        extreme_by(self.elements(), key, Ordering::Greater)
    }

    /// The element with the least key, the first one on ties.
    fn min_by(&self, key: &Value) -> Result<Option<Value>, DispatchError> {
        extreme_by(self.elements(), key, Ordering::Less)
    }

    /// The first `n` elements.
    fn take(&self, n: usize) -> Sequence {
        self.elements().iter().take(n).cloned().collect()
    }

    /// A lazy view over the elements.
    fn lazy(&self) -> Lazy<'_> {
        Lazy::over(self.elements())
    }

    /// [`select`](Enumerable::select), evaluated as the view is pulled.
    fn iselect(&self, block: &Value) -> Result<Lazy<'_>, DispatchError> {
        self.lazy().select(block)
    }

    fn ireject(&self, block: &Value) -> Result<Lazy<'_>, DispatchError> {
        self.lazy().reject(block)
    }

    fn imap(&self, block: &Value) -> Result<Lazy<'_>, DispatchError> {
        self.lazy().map(block)
    }

    fn itake(&self, n: usize) -> Lazy<'_> {
        self.lazy().take(n)
    }
}

fn filter(items: &[Value], block: &Value, keep: bool) -> Result<Sequence, DispatchError> {
    let predicate = coerce_to_predicate(block)?;
    let mut kept = Vec::new();
    for item in items {
        if predicate.eval(std::slice::from_ref(item))? == keep {
            kept.push(item.clone());
        }
    }
    Ok(Sequence::from(kept))
}

fn keyed(items: &[Value], key: &Value) -> Result<Vec<(Value, Value)>, DispatchError> {
    let callable = coerce_to_callable(key)?;
    items
        .iter()
        .map(|item| {
            callable
                .call(std::slice::from_ref(item))
                .map(|k| (k, item.clone()))
        })
        .collect()
}

fn extreme_by(items: &[Value], key: &Value, wanted: Ordering) -> Result<Option<Value>, DispatchError> {
    let keyed = keyed(items, key)?;
    let best = extreme(&keyed, wanted, |(a, _), (b, _)| {
        compare_values(a, b).map_err(DispatchError::Target)
    })?;
    Ok(best.map(|(_, item)| item))
}

/// The first element that no later element beats in the `wanted` direction.
fn extreme<T, F>(items: &[T], wanted: Ordering, mut compare: F) -> Result<Option<T>, DispatchError>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<Ordering, DispatchError>,
{
    let mut best: Option<&T> = None;
    for item in items {
        best = match best {
            Some(current) if compare(item, current)? != wanted => Some(current),
            _ => Some(item),
        };
    }
    Ok(best.cloned())
}

/// Stable merge sort whose comparison may fail; the first failure is returned.
///
/// A comparator that is not a consistent order never panics here. When the
/// merged result is out of order the sort fails instead.
fn merge_sort<T, F>(items: Vec<T>, compare: &mut F) -> Result<Vec<T>, DispatchError>
where
    F: FnMut(&T, &T) -> Result<Ordering, DispatchError>,
{
    let sorted = merge_sort_unchecked(items, compare)?;
    for pair in sorted.windows(2) {
        if compare(&pair[0], &pair[1])? == Ordering::Greater {
            return Err(DispatchError::Target(NativeError::other(
                "comparison method violates its general contract",
            )));
        }
    }
    Ok(sorted)
}

fn merge_sort_unchecked<T, F>(mut items: Vec<T>, compare: &mut F) -> Result<Vec<T>, DispatchError>
where
    F: FnMut(&T, &T) -> Result<Ordering, DispatchError>,
{
    if items.len() < 2 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_unchecked(items, compare)?;
    let right = merge_sort_unchecked(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties keep the left element first.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r)? == Ordering::Greater,
            _ => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
