//! Structural and timestamp comparison of two snapshots.

mod change_record;
mod differ;

pub use change_record::ChangeRecord;
pub use differ::{DiffError, diff};
