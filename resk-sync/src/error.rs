//! Error types for resk-sync.
//!
//! Every variant aborts the run. Nothing is retried and no partial dump is
//! written; the caller decides whether to re-run.

use std::path::PathBuf;

use thiserror::Error;

use resk_core::{DumpError, ExtractError, SnippetName};

use crate::reconcile::Operation;

/// Error type produced by port implementations (file sources, publishers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`RepoStateStore`](crate::ports::RepoStateStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored file changed since it was read (content hash mismatch).
    #[error("{path} was modified concurrently")]
    Conflict { path: String },

    /// Transport, permission or any other backend failure.
    #[error(transparent)]
    Backend(BoxError),
}

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing or reading source files failed.
    #[error("failed to discover sources at {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A block could not be extracted or formatted.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// The persisted dump could not be decoded (or encoded).
    #[error("dump at {path} is unusable: {source}")]
    MalformedDump {
        path: String,
        #[source]
        source: DumpError,
    },

    /// A create/update call on the snippet host failed.
    #[error("failed to {operation} snippet {name}: {source}")]
    Publish {
        name: SnippetName,
        operation: Operation,
        #[source]
        source: BoxError,
    },

    /// The dump was changed by someone else between read and write.
    /// Re-running the whole sync is safe.
    #[error("dump at {path} changed during the run; re-run sync")]
    Conflict { path: String },

    /// Reading or writing the dump failed for a reason other than a conflict.
    #[error("state store error for {path}: {source}")]
    StateStore {
        path: String,
        #[source]
        source: BoxError,
    },

    /// The publish worker pool could not be started.
    #[error("failed to start publish workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SyncError {
    /// Map a store failure on `path` onto the run-level taxonomy.
    pub(crate) fn from_store(path: &str, err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => SyncError::Conflict {
                path: path.to_string(),
            },
            StoreError::Backend(source) => SyncError::StateStore {
                path: path.to_string(),
                source,
            },
        }
    }
}
