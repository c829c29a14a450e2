//! Prune module - Keep only the fields a shape template asks for.

mod shape;

#[cfg(test)]
mod prune_test;

pub use shape::*;
