//! Projection of a value onto a shape template.

use crate::value::{Map, Value, ValueKind};

/// Returns the parts of `source` selected by `shape`.
///
/// - A map shape keeps exactly its own keys. Keys the source lacks map to
///   [`Value::Absent`]; a source that is not a plain map contributes nothing.
/// - A non-empty list shape prunes every source element with its first
///   element. Further template elements are ignored. An empty list shape, or
///   a source that is not a list, yields an empty list.
/// - Any other shape, opaque objects included, copies the source as is.
///
/// Mismatches never fail; they degrade to empty containers or absent leaves.
pub fn prune(source: &Value, shape: &Value) -> Value {
    prune_value(Some(source), shape)
}

/// Map-level convenience for [`prune`].
pub fn prune_map(source: &Map, shape: &Map) -> Map {
    prune_entries(Some(source), shape)
}

fn prune_value(source: Option<&Value>, shape: &Value) -> Value {
    match shape {
        Value::List(template) => {
            let (Some(Value::List(elements)), Some(element_shape)) = (source, template.first()) else {
                return Value::List(Vec::new());
            };
            Value::List(
                elements
                    .iter()
                    .map(|el| match el {
                        Value::Absent => Value::Absent,
                        el => prune_value(Some(el), element_shape),
                    })
                    .collect(),
            )
        }
        Value::Map(shape) => Value::Map(prune_entries(source.and_then(Value::as_map), shape)),
        _ => copy_leaf(source),
    }
}

fn prune_entries(source: Option<&Map>, shape: &Map) -> Map {
    shape
        .iter()
        .map(|(key, sub_shape)| {
            let child = source.and_then(|m| m.get(key));
            let pruned = match sub_shape.kind() {
                ValueKind::Leaf => copy_leaf(child),
                ValueKind::Mapping | ValueKind::Sequence => prune_value(child, sub_shape),
            };
            (key.clone(), pruned)
        })
        .collect()
}

fn copy_leaf(source: Option<&Value>) -> Value {
    source.cloned().unwrap_or(Value::Absent)
}
