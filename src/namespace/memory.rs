//! In-memory namespace used to drive the snapshot and diff code in tests.

use std::collections::HashMap;
use std::io;

use hashlink::LinkedHashMap;

use crate::ext::FileTime;
use crate::namespace::{AccessError, KeyPath, NamespaceAccessor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Readable,
    Denied,
    /// Still listed by its parent, but gone by the time it is opened.
    Vanished,
    Failing,
}

#[derive(Debug, Clone)]
struct MemoryKey {
    modified: u64,
    access: Access,
    children: LinkedHashMap<String, MemoryKey>,
}

impl MemoryKey {
    fn new(modified: u64) -> Self {
        Self {
            modified,
            access: Access::Readable,
            children: LinkedHashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryHandle {
    modified: FileTime,
    names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNamespace {
    roots: HashMap<String, MemoryKey>,
}

impl MemoryNamespace {
    pub fn new(root: &str) -> Self {
        let mut roots = HashMap::new();
        roots.insert(root.to_string(), MemoryKey::new(0));
        Self { roots }
    }

    /// Creates or updates the key at `path`, creating missing parents with a
    /// zero timestamp.
    pub fn key(mut self, root: &str, path: &str, modified: u64) -> Self {
        self.set_key(root, path, modified);
        self
    }

    pub fn set_key(&mut self, root: &str, path: &str, modified: u64) {
        let path = KeyPath::parse(path).expect("test key path must be valid");
        let mut current = self
            .roots
            .entry(root.to_string())
            .or_insert_with(|| MemoryKey::new(0));
        for segment in path.segments() {
            current = current
                .children
                .entry(segment.to_string())
                .or_insert_with(|| MemoryKey::new(0));
        }
        current.modified = modified;
    }

    pub fn remove_key(&mut self, root: &str, path: &str) {
        let path = KeyPath::parse(path).expect("test key path must be valid");
        let Some(name) = path.name() else {
            self.roots.remove(root);
            return;
        };
        let segments = path.segments().collect::<Vec<_>>();
        if let Some(parent) = self.lookup_mut(root, &segments[..segments.len() - 1]) {
            parent.children.remove(name);
        }
    }

    pub fn deny(mut self, root: &str, path: &str) -> Self {
        self.set_access(root, path, Access::Denied);
        self
    }

    pub fn set_denied(&mut self, root: &str, path: &str) {
        self.set_access(root, path, Access::Denied);
    }

    pub fn vanish(mut self, root: &str, path: &str) -> Self {
        self.set_access(root, path, Access::Vanished);
        self
    }

    pub fn fail(mut self, root: &str, path: &str) -> Self {
        self.set_access(root, path, Access::Failing);
        self
    }

    fn set_access(&mut self, root: &str, path: &str, access: Access) {
        let path = KeyPath::parse(path).expect("test key path must be valid");
        let segments = path.segments().collect::<Vec<_>>();
        let key = self
            .lookup_mut(root, &segments)
            .expect("test key must exist before changing its access");
        key.access = access;
    }

    fn lookup(&self, root: &str, path: &KeyPath) -> Option<&MemoryKey> {
        path.segments().try_fold(self.roots.get(root)?, |key, segment| {
            key.children.get(segment)
        })
    }

    fn lookup_mut(&mut self, root: &str, segments: &[&str]) -> Option<&mut MemoryKey> {
        let mut current = self.roots.get_mut(root)?;
        for segment in segments {
            current = current.children.get_mut(*segment)?;
        }
        Some(current)
    }
}

impl NamespaceAccessor for MemoryNamespace {
    type Handle = MemoryHandle;

    fn open_for_read(&self, root: &str, path: &KeyPath) -> Result<MemoryHandle, AccessError> {
        let not_found = || AccessError::NotFound { path: path.clone() };
        let key = self.lookup(root, path).ok_or_else(not_found)?;

        match key.access {
            Access::Readable => Ok(MemoryHandle {
                modified: FileTime::from_ticks(key.modified),
                names: key.children.keys().cloned().collect(),
            }),
            Access::Denied => Err(AccessError::PermissionDenied { path: path.clone() }),
            Access::Vanished => Err(not_found()),
            Access::Failing => Err(AccessError::Backend {
                path: path.clone(),
                source: io::Error::other("backend unavailable"),
            }),
        }
    }

    fn read_modified(&self, handle: &MemoryHandle) -> Result<FileTime, AccessError> {
        Ok(handle.modified)
    }

    fn child_names(
        &self,
        handle: MemoryHandle,
    ) -> Result<impl Iterator<Item = String>, AccessError> {
        Ok(handle.names.into_iter())
    }
}
