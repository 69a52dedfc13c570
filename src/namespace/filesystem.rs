use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ext::{BestEffortPathExt, FileTime, SystemTimeExt};
use crate::namespace::{AccessError, KeyPath, NamespaceAccessor};

/// Namespace backed by a directory tree on the local filesystem.
///
/// The root identifier is a directory. Every subdirectory is a key and its
/// mtime is the key's last-write time. Regular files are values and are not
/// part of the key structure; symlinks are skipped so traversal cannot loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsNamespace;

#[derive(Debug)]
pub struct FsHandle {
    dir: PathBuf,
    modified: FileTime,
    entries: ReadDir,
}

impl FsNamespace {
    fn resolve(root: &str, path: &KeyPath) -> PathBuf {
        path.segments()
            .fold(PathBuf::from(root), |dir, segment| dir.join(segment))
    }
}

impl NamespaceAccessor for FsNamespace {
    type Handle = FsHandle;

    fn open_for_read(&self, root: &str, path: &KeyPath) -> Result<FsHandle, AccessError> {
        let dir = Self::resolve(root, path);

        let metadata = fs::metadata(&dir).map_err(|err| classify(err, path))?;
        if !metadata.is_dir() {
            debug!("{} is not a directory", dir.best_effort_path_display());
            return Err(AccessError::NotFound { path: path.clone() });
        }

        let modified = metadata
            .modified()
            .map_err(|err| classify(err, path))?
            .to_file_time();
        let entries = fs::read_dir(&dir).map_err(|err| classify(err, path))?;

        Ok(FsHandle {
            dir,
            modified,
            entries,
        })
    }

    fn read_modified(&self, handle: &FsHandle) -> Result<FileTime, AccessError> {
        Ok(handle.modified)
    }

    fn child_names(
        &self,
        handle: FsHandle,
    ) -> Result<impl Iterator<Item = String>, AccessError> {
        let FsHandle { dir, entries, .. } = handle;
        Ok(entries.filter_map(move |entry| {
            let entry = listed(entry, &dir)?;
            if !listed(entry.file_type(), &dir)?.is_dir() {
                return None;
            }
            match entry.file_name().into_string() {
                Ok(name) => Some(name),
                Err(raw) => {
                    debug!("Skipping key with non UTF-8 name: {:?}", raw);
                    None
                }
            }
        }))
    }
}

/// Unwraps one result of listing `dir`. Entries that vanished mid-listing are
/// dropped quietly; any other failure is logged so a partial listing is visible.
fn listed<T>(result: io::Result<T>, dir: &Path) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(
                "Entry of {} vanished while listing it",
                dir.best_effort_path_display()
            );
            None
        }
        Err(err) => {
            warn!(
                "Skipping unreadable entry of {}: {}",
                dir.best_effort_path_display(),
                err
            );
            None
        }
    }
}

fn classify(err: io::Error, path: &KeyPath) -> AccessError {
    let path = path.clone();
    match err.kind() {
        io::ErrorKind::PermissionDenied => AccessError::PermissionDenied { path },
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => AccessError::NotFound { path },
        _ => AccessError::Backend { path, source: err },
    }
}
