//! Scratch directories for clones.

use crate::debug_log::DebugLog;
use std::io;
use std::path::Path;
use tempfile::TempDir;

/// A uniquely named directory that holds one clone.
///
/// The name carries a random suffix, so concurrent discoveries never share a
/// directory. The directory is deleted by [`Workspace::remove`], or on drop
/// if the owning task is cancelled first.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace under `root` whose name starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if `root` is missing or not writable.
    pub fn create(root: &Path, prefix: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir_in(root)?;
        Ok(Self { dir })
    }

    /// Returns the workspace directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Deletes the workspace.
    ///
    /// A directory that is already gone counts as removed. Other failures are
    /// logged and swallowed so they never mask the discovery outcome.
    pub fn remove(self, log: &DebugLog) {
        let path = self.dir.path().to_path_buf();
        log.record(format!("Cleaning up: {}", path.display()));

        match self.dir.close() {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log.record(format!("Failed to cleanup {}: {e}", path.display())),
        }
    }
}
