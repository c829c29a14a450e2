//! Core schema elements and type definitions.

use crate::error::ParseError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Schema is a list of named types.
///
/// Named types are indexed in a map before the first lookup so this type
/// should be considered immutable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDef>,

    #[serde(skip)]
    type_map: OnceCell<HashMap<String, usize>>,
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        Schema::with_types(self.types.clone())
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
    }
}

/// TypeDef represents a named type in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Top level types should be named. Every type must have a unique name.
    pub name: String,

    #[serde(flatten)]
    pub node: SchemaNode,
}

/// TypeRef either refers to a named type or declares an inline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Named(String),
    Inline(Box<SchemaNode>),
}

/// SchemaNode describes the expected structure of one value.
///
/// Schemas are used for path-based introspection, not validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SchemaNode {
    /// A scalar value; no path segment can descend into it.
    Primitive {
        #[serde(default)]
        primitive: Primitive,
    },

    /// A map with a fixed set of keys.
    Object {
        #[serde(default)]
        entries: BTreeMap<String, TypeRef>,
    },

    /// A map whose every key shares one value schema.
    Record { value: TypeRef },

    /// A homogeneous list.
    Array { item: TypeRef },

    /// A fixed-length list, optionally followed by any number of `rest`
    /// elements.
    Tuple {
        #[serde(default)]
        items: Vec<TypeRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest: Option<TypeRef>,
    },

    /// Any one of several alternatives.
    Union {
        #[serde(default)]
        options: Vec<TypeRef>,
    },

    /// Alternatives discriminated by the value at `key`.
    Variant {
        key: String,
        #[serde(default)]
        options: Vec<TypeRef>,
    },

    /// An annotation around exactly one inner schema. Transparent for
    /// traversal.
    Wrapper { wrapper: WrapperKind, wrapped: TypeRef },
}

/// Primitive is the scalar type of a primitive node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Date,
    Null,
    #[default]
    Unknown,
}

/// WrapperKind names the annotation a wrapper node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperKind {
    Optional,
    ExactOptional,
    Undefinedable,
    Nullable,
    Nullish,
    NonNullable,
    NonNullish,
    Readonly,
    Brand,
    Description,
    Metadata,
    Title,
    Flavor,
}

impl SchemaNode {
    /// Returns the lowercase kind tag of the node.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Primitive { .. } => "primitive",
            SchemaNode::Object { .. } => "object",
            SchemaNode::Record { .. } => "record",
            SchemaNode::Array { .. } => "array",
            SchemaNode::Tuple { .. } => "tuple",
            SchemaNode::Union { .. } => "union",
            SchemaNode::Variant { .. } => "variant",
            SchemaNode::Wrapper { .. } => "wrapper",
        }
    }

    /// Creates a primitive node.
    pub fn primitive(primitive: Primitive) -> Self {
        SchemaNode::Primitive { primitive }
    }

    /// Creates an object node from `(key, type)` pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, TypeRef)>) -> Self {
        SchemaNode::Object {
            entries: entries.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        }
    }

    /// Creates a wrapper node.
    pub fn wrap(wrapper: WrapperKind, wrapped: impl Into<TypeRef>) -> Self {
        SchemaNode::Wrapper {
            wrapper,
            wrapped: wrapped.into(),
        }
    }
}

impl From<SchemaNode> for TypeRef {
    fn from(node: SchemaNode) -> Self {
        TypeRef::Inline(Box::new(node))
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Named(name.to_string())
    }
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Creates a schema with the given type definitions.
    pub fn with_types(types: Vec<TypeDef>) -> Self {
        Schema {
            types,
            type_map: OnceCell::new(),
        }
    }

    /// Parses a schema document from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Schema, ParseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a schema document from JSON.
    pub fn from_json(json: &str) -> Result<Schema, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the names of the types in this schema, in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns the named TypeDef, if it exists. The first definition wins
    /// when a name is declared twice.
    pub fn find_named_type(&self, name: &str) -> Option<&TypeDef> {
        let map = self.type_map.get_or_init(|| {
            let mut map = HashMap::new();
            for (i, t) in self.types.iter().enumerate() {
                map.entry(t.name.clone()).or_insert(i);
            }
            map
        });
        map.get(name).map(|&i| &self.types[i])
    }

    /// Returns the node a reference points at, whether it is inline or
    /// named. Returns None if a named type does not exist.
    pub fn resolve<'a>(&'a self, tr: &'a TypeRef) -> Option<&'a SchemaNode> {
        match tr {
            TypeRef::Named(name) => self.find_named_type(name).map(|t| &t.node),
            TypeRef::Inline(node) => Some(node.as_ref()),
        }
    }

    /// Follows wrapper nodes down to the first non-wrapper node.
    ///
    /// Stops at the current node when its wrapped reference cannot be
    /// resolved or leads back to a node already visited.
    pub fn unwrap<'a>(&'a self, node: &'a SchemaNode) -> &'a SchemaNode {
        let mut curr = node;
        let mut seen: HashSet<*const SchemaNode> = HashSet::new();
        while let SchemaNode::Wrapper { wrapped, .. } = curr {
            seen.insert(curr as *const SchemaNode);
            match self.resolve(wrapped) {
                Some(inner) if !seen.contains(&(inner as *const SchemaNode)) => curr = inner,
                Some(_) => {
                    debug!("wrapper cycle detected; stopping unwrap");
                    break;
                }
                None => break,
            }
        }
        curr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_SCHEMA: &str = r#"types:
- name: user
  kind: object
  entries:
    name: string
    tags:
      kind: array
      item: string
    nickname:
      kind: wrapper
      wrapper: optional
      wrapped: string
- name: string
  kind: primitive
  primitive: string
"#;

    #[test]
    fn test_schema_from_yaml() {
        let schema = Schema::from_yaml(USER_SCHEMA).unwrap();
        assert_eq!(schema.type_names(), vec!["user", "string"]);

        let user = &schema.find_named_type("user").unwrap().node;
        let SchemaNode::Object { entries } = user else {
            panic!("expected object, got {}", user.kind());
        };
        assert_eq!(entries.get("name"), Some(&TypeRef::from("string")));
        assert!(matches!(entries.get("tags"), Some(TypeRef::Inline(_))));
    }

    #[test]
    fn test_schema_json_roundtrip() {
        let schema = Schema::from_yaml(USER_SCHEMA).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(Schema::from_json(&json).unwrap(), schema);
    }

    #[test]
    fn test_find_named_type() {
        let schema = Schema::with_types(vec![
            TypeDef {
                name: "string".to_string(),
                node: SchemaNode::primitive(Primitive::String),
            },
            TypeDef {
                name: "string".to_string(),
                node: SchemaNode::primitive(Primitive::Number),
            },
        ]);

        assert_eq!(
            schema.find_named_type("string").map(|t| &t.node),
            Some(&SchemaNode::primitive(Primitive::String))
        );
        assert!(schema.find_named_type("nonexistent").is_none());
    }

    #[test]
    fn test_resolve_missing_named_type() {
        let schema = Schema::new();
        assert!(schema.resolve(&TypeRef::from("nope")).is_none());
        let inline = TypeRef::from(SchemaNode::primitive(Primitive::Boolean));
        assert_eq!(
            schema.resolve(&inline),
            Some(&SchemaNode::primitive(Primitive::Boolean))
        );
    }

    #[test]
    fn test_unwrap_nested_wrappers() {
        let schema = Schema::new();
        let node = SchemaNode::wrap(
            WrapperKind::Nullable,
            SchemaNode::wrap(WrapperKind::Brand, SchemaNode::primitive(Primitive::Date)),
        );
        assert_eq!(schema.unwrap(&node), &SchemaNode::primitive(Primitive::Date));
    }

    #[test]
    fn test_unwrap_stops_on_cycles() {
        let schema = Schema::with_types(vec![
            TypeDef {
                name: "a".to_string(),
                node: SchemaNode::wrap(WrapperKind::Optional, "b"),
            },
            TypeDef {
                name: "b".to_string(),
                node: SchemaNode::wrap(WrapperKind::Readonly, "a"),
            },
            TypeDef {
                name: "self".to_string(),
                node: SchemaNode::wrap(WrapperKind::Title, "self"),
            },
        ]);

        let a = &schema.find_named_type("a").unwrap().node;
        let b = &schema.find_named_type("b").unwrap().node;
        assert!(std::ptr::eq(schema.unwrap(a), b));

        let s = &schema.find_named_type("self").unwrap().node;
        assert!(std::ptr::eq(schema.unwrap(s), s));
    }

    #[test]
    fn test_unwrap_stops_at_dangling_reference() {
        let schema = Schema::new();
        let node = SchemaNode::wrap(WrapperKind::Optional, "missing");
        assert_eq!(schema.unwrap(&node), &node);
    }
}
