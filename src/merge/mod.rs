//! Merge module - Minimal structural patches between maps.
//!
//! [`diff`] and [`apply_patch`] are inverse in the sense that
//! `apply_patch(a, &diff(a, b)) == b` whenever `b` keeps every key of `a`.

mod diff;


pub use diff::*;
