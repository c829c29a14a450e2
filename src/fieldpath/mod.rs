//! Field path module - Dot paths and the nested value accessor.
//!
//! A path is a dot-separated string. Segments made of digits (optionally
//! with a leading minus) address list positions; all others address map
//! keys.

mod accessor;
mod path;

pub use accessor::*;
pub use path::*;
