//! Path-based lookup of sub-schemas.
//!
//! Unions and variants carry no key or position information of their own,
//! so the resolver has to guess which alternative a path segment is about:
//!
//! - an index segment prefers the first array or tuple alternative;
//! - a key segment prefers the first object declaring that key, or the first
//!   record;
//! - otherwise [`ResolveOptions::prefer_option`] picks the fallback.
//!
//! The chosen alternative then consumes the same segment. This is a policy,
//! not a guarantee.

use super::elements::{Schema, SchemaNode, TypeRef};
use crate::fieldpath::{Path, PathElement};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// ResolveOptions controls how unions and variants are narrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Alternative used when no alternative matches the path segment.
    /// `None` makes such paths unresolved instead.
    pub prefer_option: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            prefer_option: Some(0),
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        ResolveOptions::default()
    }

    /// Falls back to the alternative at `index`.
    pub fn prefer_option(mut self, index: usize) -> Self {
        self.prefer_option = Some(index);
        self
    }

    /// Leaves ambiguous unions unresolved.
    pub fn no_fallback(mut self) -> Self {
        self.prefer_option = None;
        self
    }

    /// Builds options from a signed preference where any negative value
    /// means "no fallback".
    pub fn from_signed(prefer_option: i64) -> Self {
        ResolveOptions {
            prefer_option: usize::try_from(prefer_option).ok(),
        }
    }
}

impl Schema {
    /// Returns the sub-schema addressed by `path` inside the named type.
    pub fn type_at_path(&self, type_name: &str, path: &str, opts: &ResolveOptions) -> Option<&SchemaNode> {
        let root = &self.find_named_type(type_name)?.node;
        self.node_at_path(root, path, opts)
    }

    /// Returns the sub-schema addressed by `path` inside the referenced type.
    pub fn ref_at_path<'a>(&'a self, root: &'a TypeRef, path: &str, opts: &ResolveOptions) -> Option<&'a SchemaNode> {
        self.node_at_path(self.resolve(root)?, path, opts)
    }

    /// Returns the sub-schema addressed by `path` inside `root`, fully
    /// unwrapped, or `None` when the path cannot be followed.
    ///
    /// The empty path addresses `root` itself.
    pub fn node_at_path<'a>(&'a self, root: &'a SchemaNode, path: &str, opts: &ResolveOptions) -> Option<&'a SchemaNode> {
        let path = Path::parse(path);
        let resolved = self.walk(root, path.as_slice(), opts, &mut HashSet::new());
        if resolved.is_none() {
            debug!(path = %path, "schema path unresolved");
        }
        resolved
    }

    /// Resolves `segments` starting at `node`. `narrowed` holds the unions
    /// already tried for the current segment.
    fn walk<'a>(
        &'a self,
        node: &'a SchemaNode,
        segments: &[PathElement],
        opts: &ResolveOptions,
        narrowed: &mut HashSet<*const SchemaNode>,
    ) -> Option<&'a SchemaNode> {
        let node = self.unwrap(node);
        let Some((segment, rest)) = segments.split_first() else {
            return Some(node);
        };

        let next = match node {
            SchemaNode::Object { entries } => self.resolve(entries.get(segment.key())?)?,
            SchemaNode::Record { value } => self.resolve(value)?,
            SchemaNode::Array { item } => {
                segment.as_index()?;
                self.resolve(item)?
            }
            SchemaNode::Tuple { items, rest: tail } => {
                let i = segment.as_position()?;
                match items.get(i) {
                    Some(item) => self.resolve(item)?,
                    None => self.resolve(tail.as_ref()?)?,
                }
            }
            SchemaNode::Union { options } | SchemaNode::Variant { options, .. } => {
                if !narrowed.insert(node as *const SchemaNode) {
                    debug!(segment = %segment, "union revisited while narrowing; giving up");
                    return None;
                }
                let chosen = self.narrow(options, segment, opts)?;
                return self.walk(chosen, segments, opts, narrowed);
            }
            SchemaNode::Primitive { .. } | SchemaNode::Wrapper { .. } => {
                trace!(segment = %segment, kind = node.kind(), "cannot descend");
                return None;
            }
        };

        narrowed.clear();
        self.walk(next, rest, opts, narrowed)
    }

    /// Picks the alternative of a union or variant that `segment` is most
    /// likely about.
    fn narrow<'a>(&'a self, options: &'a [TypeRef], segment: &PathElement, opts: &ResolveOptions) -> Option<&'a SchemaNode> {
        let unwrapped = |o: &'a TypeRef| self.resolve(o).map(|n| self.unwrap(n));

        let matching = if segment.is_index() {
            options.iter().find(|o| {
                matches!(
                    unwrapped(*o),
                    Some(SchemaNode::Array { .. } | SchemaNode::Tuple { .. })
                )
            })
        } else {
            options.iter().find(|o| match unwrapped(*o) {
                Some(SchemaNode::Object { entries }) => entries.contains_key(segment.key()),
                Some(SchemaNode::Record { .. }) => true,
                _ => false,
            })
        };

        let chosen = match matching {
            Some(option) => option,
            None => {
                trace!(segment = %segment, fallback = ?opts.prefer_option, "no alternative matched");
                options.get(opts.prefer_option?)?
            }
        };
        self.resolve(chosen)
    }
}
