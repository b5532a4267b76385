//! Filesystem [`FileSource`]: walks a directory tree for supported files.
//!
//! `.gitignore` rules apply whether or not the tree is a git checkout, and
//! dotfiles are included.

use std::path::{Path, PathBuf};

use resk_core::language;

use crate::error::BoxError;
use crate::ports::FileSource;

/// Source files under a root directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSource for FsSource {
    fn discover(&self) -> Result<Vec<PathBuf>, BoxError> {
        let root = std::fs::canonicalize(&self.root)?;
        let walker = ignore::WalkBuilder::new(&root)
            .hidden(false)
            .require_git(false)
            .build();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let supported = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(|ext| language::resolve(&format!(".{ext}")))
                .is_some();
            if supported {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        tracing::debug!(root = %root.display(), count = paths.len(), "discovered files");
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<String, BoxError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
