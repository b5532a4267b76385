//! Filesystem-backed [`RepoStateStore`]: keeps the dump in a local directory
//! instead of a hosted repository.
//!
//! Layout: `<root>/<ref>/<path>`, e.g. `<root>/master/.github/resk.json`.
//! Files hold the decoded bytes; the port's base64 content is produced on read.
//! The sha is the SHA-256 hex digest of the stored bytes. Writes use the
//! `.tmp` + rename pattern.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::ports::{RepoStateStore, StoredFile};

/// Dump storage rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    root: PathBuf,
}

impl LocalStateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/<ref>/<path>`: pure, no I/O.
    pub fn file_path(&self, path: &str, git_ref: &str) -> PathBuf {
        self.root.join(git_ref).join(path)
    }
}

/// SHA-256 hex digest of `bytes`.
pub fn content_sha(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::Backend(Box::new(err))),
    }
}

impl RepoStateStore for LocalStateStore {
    fn read(&self, path: &str, git_ref: &str) -> Result<Option<StoredFile>, StoreError> {
        let file = self.file_path(path, git_ref);
        Ok(read_bytes(&file)?.map(|bytes| StoredFile {
            sha: content_sha(&bytes),
            content: STANDARD.encode(&bytes),
        }))
    }

    fn write(
        &self,
        path: &str,
        content: &str,
        prior_sha: Option<&str>,
        message: &str,
        git_ref: &str,
    ) -> Result<(), StoreError> {
        let file = self.file_path(path, git_ref);
        let current = read_bytes(&file)?.map(|bytes| content_sha(&bytes));
        if current.as_deref() != prior_sha {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        let bytes = STANDARD
            .decode(content)
            .map_err(|e| StoreError::Backend(Box::new(e)))?;

        let backend = |e: std::io::Error| StoreError::Backend(Box::new(e));
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir).map_err(backend)?;
        }
        let tmp = PathBuf::from(format!("{}.tmp", file.display()));
        std::fs::write(&tmp, &bytes).map_err(backend)?;
        if let Err(e) = std::fs::rename(&tmp, &file) {
            let _ = std::fs::remove_file(&tmp);
            return Err(backend(e));
        }

        tracing::info!(path = %file.display(), commit_message = message, "wrote state file");
        Ok(())
    }
}
