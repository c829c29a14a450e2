//! Value module - In-memory representation of YAML/JSON objects.
//!
//! Values are classified structurally into mappings, sequences and leaves.

mod value;

pub use value::*;
