use std::time::Instant;

use hashlink::LinkedHashMap;
use snafu::prelude::*;
use tracing::{debug, trace};

use crate::ext::FileTime;
use crate::namespace::{
    AccessError, InvalidKeyName, KeyPath, NamespaceAccessor, validate_key_name,
};
use crate::snapshot::Tree;

/// Builds depth-bounded snapshots of a namespace.
///
/// Traversal is sequential and takes no locks on the namespace, so a snapshot
/// of a namespace that changes underneath it simply reflects whatever was
/// observed at each key.
pub struct SnapshotBuilder<'a, A> {
    accessor: &'a A,
}

impl<'a, A: NamespaceAccessor> SnapshotBuilder<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self { accessor }
    }

    /// Snapshots `start` under `root`.
    ///
    /// `filter`, when given, replaces the enumeration of the starting key's
    /// children; deeper levels are always enumerated in full. With
    /// `max_depth == 0` only the starting key itself is read.
    pub fn build(
        &self,
        root: &str,
        start: &KeyPath,
        filter: Option<&[String]>,
        max_depth: u32,
    ) -> Result<Tree, BuildError> {
        if let Some(filter) = filter {
            for name in filter {
                validate_key_name(name).context(InvalidFilterSnafu)?;
            }
        }

        let started = Instant::now();
        let tree = self
            .build_node(root, start.clone(), filter, max_depth)?
            .context(StartNotFoundSnafu {
                root,
                path: start.clone(),
            })?;
        let elapsed = started.elapsed();

        debug!("Snapshot of '{}': {}", start, tree.info());
        debug!("Generation time: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
        if !tree.is_complete() {
            debug!("Tree is not complete");
        }

        Ok(tree)
    }

    /// Returns `None` when the key disappeared before it could be read.
    fn build_node(
        &self,
        root: &str,
        path: KeyPath,
        filter: Option<&[String]>,
        max_depth: u32,
    ) -> Result<Option<Tree>, BuildError> {
        let (modified, names) = match self.read_key(root, &path, filter, max_depth > 0) {
            Ok(read) => read,
            Err(AccessError::PermissionDenied { .. }) => {
                debug!("Key '{}' is restricted", path);
                return Ok(Some(Tree::restricted(path)));
            }
            Err(AccessError::NotFound { .. }) => {
                debug!("Key '{}' vanished during traversal, omitting it", path);
                return Ok(None);
            }
            Err(source) => return Err(BuildError::NamespaceError { source }),
        };
        trace!("Key '{}' last written at tick {}", path, modified);

        let Some(names) = names else {
            return Ok(Some(Tree::not_expanded(path, modified)));
        };

        let mut children = LinkedHashMap::with_capacity(names.len());
        for name in names {
            let child_path = path.join(&name);
            if let Some(child) = self.build_node(root, child_path, None, max_depth - 1)? {
                children.insert(name, child);
            }
        }

        Ok(Some(Tree::expanded(path, modified, children)))
    }

    /// Reads the key's timestamp and, when `expand` is set, the names of the
    /// children to descend into. The handle is dropped before returning.
    fn read_key(
        &self,
        root: &str,
        path: &KeyPath,
        filter: Option<&[String]>,
        expand: bool,
    ) -> Result<(FileTime, Option<Vec<String>>), AccessError> {
        let handle = self.accessor.open_for_read(root, path)?;
        let modified = self.accessor.read_modified(&handle)?;

        let names = match (expand, filter) {
            (false, _) => None,
            (true, Some(filter)) => Some(filter.to_vec()),
            (true, None) => Some(self.accessor.child_names(handle)?.collect()),
        };

        Ok((modified, names))
    }
}

#[derive(Debug, Snafu)]
pub enum BuildError {
    #[snafu(display("Invalid entry in the child filter"))]
    InvalidFilterError { source: InvalidKeyName },
    #[snafu(display("Starting key '{}' does not exist under root '{}'", path, root))]
    StartNotFoundError { root: String, path: KeyPath },
    #[snafu(display("Failed to read the namespace"))]
    NamespaceError { source: AccessError },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::namespace::MemoryNamespace;

    const ROOT: &str = "HKLM";

    fn sample() -> MemoryNamespace {
        MemoryNamespace::new(ROOT)
            .key(ROOT, "SYSTEM", 10)
            .key(ROOT, "SYSTEM/Select", 11)
            .key(ROOT, "SYSTEM/Setup", 12)
            .key(ROOT, "SYSTEM/Setup/Pid", 13)
            .key(ROOT, "SOFTWARE", 20)
            .key(ROOT, "SAM", 30)
            .deny(ROOT, "SAM")
    }

    fn build(ns: &MemoryNamespace, filter: Option<&[String]>, max_depth: u32) -> Tree {
        SnapshotBuilder::new(ns)
            .build(ROOT, &KeyPath::root(), filter, max_depth)
            .expect("build should succeed")
    }

    #[test]
    fn full_depth_build_is_complete() {
        let tree = build(&sample(), None, 10);

        assert!(tree.is_complete());
        assert!(tree.get("SAM").unwrap().is_restricted());
        let setup = tree.get("SYSTEM").unwrap().get("Setup").unwrap();
        assert_eq!(setup.modified(), Some(FileTime::from_ticks(12)));
        assert_eq!(setup.path().to_string(), "SYSTEM/Setup");
        assert_eq!(setup.get("Pid").unwrap().children().map(|c| c.len()), Some(0));
    }

    #[test]
    fn children_keep_arrival_order() {
        let tree = build(&sample(), None, 1);
        let names = tree.children().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec!["SYSTEM", "SOFTWARE", "SAM"]);
    }

    #[test]
    fn zero_depth_reads_only_the_start_key() {
        let tree = build(&sample(), None, 0);

        assert!(tree.children().is_none());
        assert!(!tree.is_restricted());
        assert!(!tree.is_complete());
        assert_eq!(tree.info().nodes, 1);
    }

    #[rstest]
    #[case(1, false, 1)]
    #[case(2, false, 2)]
    #[case(3, false, 3)]
    #[case(4, true, 3)]
    fn depth_limit_controls_completeness(
        #[case] max_depth: u32,
        #[case] complete: bool,
        #[case] deepest: usize,
    ) {
        let tree = build(&sample(), None, max_depth);
        assert_eq!(tree.is_complete(), complete);
        assert_eq!(tree.info().max_depth, deepest);
    }

    #[test]
    fn restricted_leaf_at_depth_limit_stays_complete() {
        let ns = MemoryNamespace::new(ROOT).key(ROOT, "SAM", 1).deny(ROOT, "SAM");
        let tree = build(&ns, None, 1);

        assert!(tree.is_complete());
        assert_eq!(tree.info().restricted, 1);
    }

    #[test]
    fn filter_scopes_only_the_first_level() {
        let filter = vec!["SYSTEM".to_string()];
        let tree = build(&sample(), Some(&filter), 10);

        let names = tree.children().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec!["SYSTEM"]);
        assert_eq!(tree.get("SYSTEM").unwrap().children().unwrap().len(), 2);
    }

    #[test]
    fn filter_entries_that_do_not_exist_are_omitted() {
        let filter = vec!["SYSTEM".to_string(), "HARDWARE".to_string()];
        let tree = build(&sample(), Some(&filter), 10);

        assert!(tree.get("HARDWARE").is_none());
        assert_eq!(tree.children().unwrap().len(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("SYSTEM/Select")]
    #[case("..")]
    fn malformed_filter_is_rejected(#[case] entry: &str) {
        let filter = vec![entry.to_string()];
        let result =
            SnapshotBuilder::new(&sample()).build(ROOT, &KeyPath::root(), Some(&filter), 3);

        assert!(matches!(result, Err(BuildError::InvalidFilterError { .. })));
    }

    #[test]
    fn vanished_child_is_omitted() {
        let ns = sample().vanish(ROOT, "SOFTWARE");
        let tree = build(&ns, None, 10);

        assert!(tree.get("SOFTWARE").is_none());
        assert!(tree.get("SYSTEM").is_some());
        assert!(tree.is_complete());
    }

    #[test]
    fn backend_failure_fails_the_whole_build() {
        let ns = sample().fail(ROOT, "SYSTEM/Setup/Pid");
        let result = SnapshotBuilder::new(&ns).build(ROOT, &KeyPath::root(), None, 10);

        assert!(matches!(
            result,
            Err(BuildError::NamespaceError {
                source: AccessError::Backend { .. }
            })
        ));
    }

    #[test]
    fn missing_start_key_is_an_error() {
        let start = KeyPath::parse("HARDWARE").unwrap();
        let result = SnapshotBuilder::new(&sample()).build(ROOT, &start, None, 2);
        assert!(matches!(result, Err(BuildError::StartNotFoundError { .. })));
    }

    #[test]
    fn restricted_start_key_yields_restricted_tree() {
        let tree = SnapshotBuilder::new(&sample())
            .build(ROOT, &KeyPath::parse("SAM").unwrap(), None, 5)
            .unwrap();

        assert!(tree.is_restricted());
        assert!(tree.is_complete());
    }

    #[test]
    fn subtree_snapshot_uses_full_paths() {
        let tree = SnapshotBuilder::new(&sample())
            .build(ROOT, &KeyPath::parse("SYSTEM").unwrap(), None, 5)
            .unwrap();

        assert_eq!(tree.path().to_string(), "SYSTEM");
        let pid = tree.get("Setup").unwrap().get("Pid").unwrap();
        assert_eq!(pid.path().to_string(), "SYSTEM/Setup/Pid");
    }

    #[test]
    fn rebuilding_an_unchanged_namespace_is_identical() {
        let ns = sample();
        assert_eq!(build(&ns, None, 10), build(&ns, None, 10));
    }
}
