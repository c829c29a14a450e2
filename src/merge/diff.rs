//! Structural diff between two maps and application of the resulting patch.
//!
//! A patch holds only the keys of the updated map whose value changed or is
//! new. Nested maps produce nested patches; lists and other leaves are
//! atomic and replaced wholesale.

use crate::value::{Map, Value};
use tracing::trace;

/// Computes the minimal patch that turns `base` into `updated` when applied
/// with [`apply_patch`].
///
/// Keys present only in `base` never appear in the patch, so removals are
/// not expressed.
pub fn diff(base: &Map, updated: &Map) -> Map {
    let mut patch = Map::new();

    for (key, new) in updated.iter() {
        let Some(old) = base.get(key) else {
            patch.set(key.clone(), new.clone());
            continue;
        };

        match (old, new) {
            (Value::Map(old), Value::Map(new)) => {
                let nested = diff(old, new);
                if !nested.is_empty() {
                    patch.set(key.clone(), Value::Map(nested));
                }
            }
            _ if old != new => {
                trace!(key = %key, "value changed");
                patch.set(key.clone(), new.clone());
            }
            _ => {}
        }
    }

    patch
}

/// Applies `patch` to a copy of `base`, merging one level at a time.
///
/// Where both the base value and the patch value are maps the merge
/// recurses; everything else is assigned as is.
pub fn apply_patch(base: &Map, patch: &Map) -> Map {
    let mut merged = base.clone();

    for (key, change) in patch.iter() {
        let next = match (merged.get(key), change) {
            (Some(Value::Map(old)), Value::Map(change)) => Value::Map(apply_patch(old, change)),
            _ => change.clone(),
        };
        merged.set(key.clone(), next);
    }

    merged
}
