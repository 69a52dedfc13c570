use snafu::Snafu;

use crate::ext::FileTime;
use crate::namespace::KeyPath;

/// Read-only access to a hierarchical, permission-gated key namespace.
///
/// A handle is held only while a key's timestamp is read and its immediate
/// children are listed; `child_names` consumes it so the handle is released
/// before the caller descends into the children.
pub trait NamespaceAccessor {
    type Handle;

    /// Opens `path` below the namespace `root` for reading.
    fn open_for_read(&self, root: &str, path: &KeyPath) -> Result<Self::Handle, AccessError>;

    fn read_modified(&self, handle: &Self::Handle) -> Result<FileTime, AccessError>;

    /// Lists the names of the immediate children in arrival order.
    ///
    /// Enumeration is best-effort: entries that disappear while the listing is
    /// in progress may be silently skipped.
    fn child_names(
        &self,
        handle: Self::Handle,
    ) -> Result<impl Iterator<Item = String>, AccessError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AccessError {
    #[snafu(display("Permission denied for key '{}'", path))]
    PermissionDenied { path: KeyPath },
    #[snafu(display("Key '{}' does not exist", path))]
    NotFound { path: KeyPath },
    #[snafu(display("Failed to access key '{}'", path))]
    Backend {
        path: KeyPath,
        source: std::io::Error,
    },
}
