//! Read-only access to hierarchical key namespaces.
//!
//! The snapshot builder only talks to a namespace through
//! [`NamespaceAccessor`], which distinguishes a denied key from a missing one
//! and from any other backend failure.

mod accessor;
mod filesystem;
mod key_path;
#[cfg(test)]
mod memory;

pub use accessor::{AccessError, NamespaceAccessor};
pub use filesystem::FsNamespace;
pub use key_path::{InvalidKeyName, InvalidKeyPath, KeyPath, validate_key_name};
#[cfg(test)]
pub use memory::MemoryNamespace;
