use std::fmt;

use crate::snapshot::Tree;

/// Counts gathered over a snapshot, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeInfo {
    pub nodes: usize,
    pub restricted: usize,
    pub unexpanded: usize,
    /// Depth of the deepest key in the snapshot; the snapshot root is 0.
    pub max_depth: usize,
}

impl TreeInfo {
    fn absorb(&mut self, other: TreeInfo) {
        self.nodes += other.nodes;
        self.restricted += other.restricted;
        self.unexpanded += other.unexpanded;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

impl Tree {
    pub fn info(&self) -> TreeInfo {
        self.info_at(0)
    }

    fn info_at(&self, depth: usize) -> TreeInfo {
        let mut info = TreeInfo {
            nodes: 1,
            max_depth: depth,
            ..TreeInfo::default()
        };

        if self.is_restricted() {
            info.restricted = 1;
        }

        match self.children() {
            Some(children) => {
                for child in children.values() {
                    info.absorb(child.info_at(depth + 1));
                }
            }
            None if !self.is_restricted() => info.unexpanded = 1,
            None => {}
        }

        info
    }
}

impl fmt::Display for TreeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} restricted, {} unexpanded, max depth {}",
            self.nodes, self.restricted, self.unexpanded, self.max_depth
        )
    }
}
