//! # Structured Shape
//!
//! Structural comparison, shape-constrained pruning and schema path
//! resolution over JSON/YAML-like value trees.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of nested maps, lists and leaves
//! - [`fieldpath`] - Dot path parsing and the get/set path accessor
//! - [`merge`] - Minimal structural patches between two maps, and applying them
//! - [`prune`] - Projection of a value onto a shape template
//! - [`schema`] - Schema description trees and path-based sub-schema lookup
//!
//! Everything except [`fieldpath::set_by_path`] is pure: inputs are borrowed
//! and results are freshly allocated.

pub mod error;
pub mod fieldpath;
pub mod merge;
pub mod prune;
pub mod schema;
pub mod value;

pub use error::{ParseError, PathError};
pub use fieldpath::{get_by_path, set_by_path, Path, PathElement};
pub use merge::{apply_patch, diff};
pub use prune::prune;
pub use schema::{ResolveOptions, Schema, SchemaNode, TypeRef};
pub use value::{Map, Opaque, Value, ValueKind};
