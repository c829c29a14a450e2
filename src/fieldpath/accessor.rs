//! Reading and writing nested values by dot path.
//!
//! [`Path::lookup`] is total: anything that cannot be followed reads as
//! `None`. [`Path::assign`] is the one mutating operation in the crate; it
//! writes into the caller's container and creates missing intermediates.

use super::path::{Path, PathElement};
use crate::error::PathError;
use crate::value::{Map, Value};

impl Path {
    /// Returns the value at this path, or `None` as soon as an intermediate
    /// is missing, null or a leaf. A stored `Absent` also reads as `None`.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        if !root.is_container() {
            return None;
        }
        let mut curr = root;
        for element in self {
            curr = match curr {
                Value::Map(m) => m.get(element.key())?,
                Value::List(l) => l.get(element.as_position()?)?,
                _ => return None,
            };
        }
        if curr.is_absent() {
            None
        } else {
            Some(curr)
        }
    }

    /// Writes `value` at this path inside `root` and returns `root`.
    ///
    /// Missing, null or absent intermediates become an empty list when the
    /// following segment is a non-negative index and an empty map otherwise.
    /// Existing intermediates are left as they are; writing past the end of
    /// a list grows it with `Absent` holes.
    pub fn assign<'a>(&self, root: &'a mut Value, value: Value) -> Result<&'a mut Value, PathError> {
        let (last, parents) = self.as_slice().split_last().ok_or(PathError::EmptyPath)?;

        let mut curr: &mut Value = &mut *root;
        for (i, element) in parents.iter().enumerate() {
            let slot = child_slot(curr, element, || self.prefix(i))?;
            if slot.is_nullish() {
                *slot = if self.as_slice()[i + 1].as_position().is_some() {
                    Value::List(Vec::new())
                } else {
                    Value::Map(Map::new())
                };
            }
            curr = slot;
        }
        *child_slot(curr, last, || self.prefix(parents.len()))? = value;
        Ok(root)
    }
}

/// Largest number of `Absent` holes a single write may add to a list.
pub const MAX_LIST_GAP: usize = 1 << 16;

/// Returns the slot for `element` inside `container`, creating it as
/// `Absent` when missing. Positions more than [`MAX_LIST_GAP`] past the end
/// of a list are rejected.
fn child_slot<'a>(
    container: &'a mut Value,
    element: &PathElement,
    at: impl Fn() -> Path,
) -> Result<&'a mut Value, PathError> {
    match container {
        Value::Map(m) => Ok(m
            .fields
            .entry(element.key().to_string())
            .or_insert(Value::Absent)),
        Value::List(l) => {
            let pos = element
                .as_position()
                .filter(|&pos| pos.saturating_sub(l.len()) <= MAX_LIST_GAP)
                .ok_or_else(|| PathError::invalid_index(at().to_string(), element.key()))?;
            if pos >= l.len() {
                l.resize(pos + 1, Value::Absent);
            }
            Ok(&mut l[pos])
        }
        other => Err(PathError::not_a_container(at().to_string(), other.type_name())),
    }
}

/// Gets the value at a dot path such as `rows.0.value`.
pub fn get_by_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    Path::parse(path).lookup(root)
}

/// Sets the value at a dot path, mutating `root` in place, and returns
/// `root` for chaining.
pub fn set_by_path<'a>(root: &'a mut Value, path: &str, value: Value) -> Result<&'a mut Value, PathError> {
    Path::parse(path).assign(root, value)
}
