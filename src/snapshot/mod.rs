//! Depth-bounded snapshots of a namespace subtree.
//!
//! A snapshot records, per key, the last-write time and whether the key could
//! be read at all. Children are either expanded, or absent because the key is
//! restricted or because the depth limit was reached; only the latter makes a
//! snapshot incomplete.

mod builder;
mod display;
mod info;
mod tree;

pub use builder::{BuildError, SnapshotBuilder};
pub use tree::Tree;
