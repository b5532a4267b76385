//! Seams between the sync pipeline and the outside world.
//!
//! All ports are blocking and shareable across threads: publish calls are
//! issued from a worker pool.

use std::path::{Path, PathBuf};

use resk_core::{RemoteRef, SnippetName};

use crate::error::{BoxError, StoreError};

/// Lists and reads candidate source files.
pub trait FileSource: Send + Sync {
    /// Paths of every file that may contain blocks, in a stable order.
    fn discover(&self) -> Result<Vec<PathBuf>, BoxError>;

    /// Full text of `path`.
    fn read(&self, path: &Path) -> Result<String, BoxError>;

    /// Root used in error messages.
    fn root(&self) -> &Path;
}

/// A file as stored in the repository: base64 `content` plus the content
/// hash used for conditional writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content: String,
    pub sha: String,
}

/// Repository-hosted file storage for the dump.
pub trait RepoStateStore: Send + Sync {
    /// Read `path` at `git_ref`. `Ok(None)` when the file does not exist.
    fn read(&self, path: &str, git_ref: &str) -> Result<Option<StoredFile>, StoreError>;

    /// Write base64 `content` to `path` on `git_ref`.
    ///
    /// `prior_sha` is the sha returned by [`read`](Self::read), or `None` when
    /// the file is expected not to exist. A mismatch is a
    /// [`StoreError::Conflict`].
    fn write(
        &self,
        path: &str,
        content: &str,
        prior_sha: Option<&str>,
        message: &str,
        git_ref: &str,
    ) -> Result<(), StoreError>;
}

/// Snippet host (e.g. GitHub Gists).
pub trait PublishPort: Send + Sync {
    fn create(&self, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError>;

    fn update(&self, id: &str, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError>;
}
