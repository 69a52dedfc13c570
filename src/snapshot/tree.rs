use hashlink::LinkedHashMap;

use crate::ext::FileTime;
use crate::namespace::KeyPath;

/// Children of an accessible key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Traversal stopped here because the depth budget ran out.
    NotExpanded,
    /// Children in the order the namespace reported them. May be empty.
    Expanded(LinkedHashMap<String, Tree>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    /// The namespace refused to open the key for reading.
    Restricted,
    Accessible {
        modified: FileTime,
        children: Children,
    },
}

/// Immutable snapshot of one key and everything observed below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    path: KeyPath,
    state: NodeState,
    complete: bool,
}

impl Tree {
    pub fn restricted(path: KeyPath) -> Self {
        Self {
            path,
            state: NodeState::Restricted,
            complete: true,
        }
    }

    pub fn not_expanded(path: KeyPath, modified: FileTime) -> Self {
        Self {
            path,
            state: NodeState::Accessible {
                modified,
                children: Children::NotExpanded,
            },
            complete: false,
        }
    }

    pub fn expanded(
        path: KeyPath,
        modified: FileTime,
        children: LinkedHashMap<String, Tree>,
    ) -> Self {
        let complete = children.values().all(Tree::is_complete);
        Self {
            path,
            state: NodeState::Accessible {
                modified,
                children: Children::Expanded(children),
            },
            complete,
        }
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self.state, NodeState::Restricted)
    }

    pub fn modified(&self) -> Option<FileTime> {
        match self.state {
            NodeState::Accessible { modified, .. } => Some(modified),
            NodeState::Restricted => None,
        }
    }

    /// The expanded children, or `None` when the key is restricted or was not
    /// expanded.
    pub fn children(&self) -> Option<&LinkedHashMap<String, Tree>> {
        match &self.state {
            NodeState::Accessible {
                children: Children::Expanded(children),
                ..
            } => Some(children),
            _ => None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.children().is_some()
    }

    /// True when no key in this subtree was cut off by the depth limit.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The expanded child called `name`.
    pub fn get(&self, name: &str) -> Option<&Tree> {
        self.children()?.get(name)
    }
}
