use std::fmt;

use crate::snapshot::Tree;

const INDENT: &str = "  ";

/// Indented rendering of a snapshot, one key name per line.
pub struct TreeDisplay<'a> {
    tree: &'a Tree,
}

impl Tree {
    pub fn display(&self) -> TreeDisplay<'_> {
        TreeDisplay { tree: self }
    }
}

impl TreeDisplay<'_> {
    fn write_level(tree: &Tree, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = INDENT.repeat(level);
        match tree.children() {
            Some(children) => {
                for (name, child) in children {
                    writeln!(f, "{offset}{name}")?;
                    Self::write_level(child, level + 1, f)?;
                }
                Ok(())
            }
            None if tree.is_restricted() => writeln!(f, "{offset}RESTRICTED"),
            None => writeln!(f, "{offset}NOT EXPANDED"),
        }
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_level(self.tree, 0, f)
    }
}
