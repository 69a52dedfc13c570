use std::fmt;

use chrono::{DateTime, Local};

use crate::namespace::KeyPath;

/// One difference between two snapshots of the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRecord {
    /// The key's last-write time changed; `timestamp` is the later of the two.
    ModifiedKey {
        path: KeyPath,
        timestamp: DateTime<Local>,
    },
    /// One snapshot expanded the key at `depth` and the other did not, so its
    /// children could not be compared.
    NonmatchingExpansion { depth: usize },
    /// A key present in the older snapshot is gone.
    MissingKey { path: KeyPath },
    /// A key absent from the older snapshot appeared.
    NewKey { path: KeyPath },
}

impl ChangeRecord {
    pub fn tag(&self) -> &'static str {
        match self {
            ChangeRecord::ModifiedKey { .. } => "MODIFIED_KEY",
            ChangeRecord::NonmatchingExpansion { .. } => "NONMATCHING_EXPANSION",
            ChangeRecord::MissingKey { .. } => "MISSING_KEY",
            ChangeRecord::NewKey { .. } => "NEW_KEY",
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            ChangeRecord::ModifiedKey { path, .. }
            | ChangeRecord::MissingKey { path }
            | ChangeRecord::NewKey { path } => Some(path),
            ChangeRecord::NonmatchingExpansion { .. } => None,
        }
    }
}

fn shown(path: &KeyPath) -> String {
    if path.is_root() {
        KeyPath::SEPARATOR.to_string()
    } else {
        path.to_string()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeRecord::ModifiedKey { path, timestamp } => write!(
                f,
                "{} {} {}",
                self.tag(),
                shown(path),
                timestamp.format("%Y-%m-%d %H:%M:%S%.f %:z")
            ),
            ChangeRecord::NonmatchingExpansion { depth } => {
                write!(f, "{} at depth {}", self.tag(), depth)
            }
            ChangeRecord::MissingKey { path } | ChangeRecord::NewKey { path } => {
                write!(f, "{} {}", self.tag(), shown(path))
            }
        }
    }
}
