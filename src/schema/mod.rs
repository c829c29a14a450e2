//! Schema module defines the schema description trees walked by the path
//! resolver.
//!
//! A schema is a list of named type definitions. Children are either a
//! reference to a named type or an inline node, so recursive and
//! self-referential types are expressible.

mod elements;
mod resolve;


pub use elements::*;
pub use resolve::*;
