//! Sync pipeline entrypoint used by the CLI.
//!
//! ## `run`: strictly ordered steps
//!
//! 1. Discover source files and load those with a registered language.
//! 2. Extract snippets from every file (files are processed in parallel).
//! 3. No snippets → stop; the dump is not touched.
//! 4. Read the previous dump from the state store.
//! 5. Reconcile: publish creates/updates (or only plan them in dry-run mode).
//! 6. Write the new dump with the sha from step 4.
//!
//! [`lookup`] resolves one snippet name to its published URL from the dump.

use std::path::Path;

use rayon::prelude::*;

use resk_core::{
    dump::{self, DUMP_PATH},
    extract::{self, Formatter, LoadedFile},
    language,
    Dump, Snippet,
};

use crate::error::SyncError;
use crate::ports::{FileSource, PublishPort, RepoStateStore, StoredFile};
use crate::reconcile::{self, Action, Planned, DEFAULT_CONCURRENCY};

/// Commit message used when persisting the dump.
pub const DEFAULT_MESSAGE: &str = "Resk action paths update.";

/// Branch read from and written to when none is given.
pub const DEFAULT_BRANCH: &str = "master";

/// Settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Repository path of the dump.
    pub dump_path: String,
    /// Maximum publish calls in flight.
    pub concurrency: usize,
    /// Classify snippets without publishing or writing the dump.
    pub dry_run: bool,
    /// Commit message for the dump write.
    pub message: String,
}

impl SyncOptions {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: DEFAULT_BRANCH.to_string(),
            dump_path: DUMP_PATH.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Parse `owner/repo`. Both halves must be non-empty.
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No blocks were found; nothing was published or written.
    NoSnippets,
    /// Dry run: what would be published.
    Planned(Vec<Planned>),
    /// Snippets were published and the dump was written.
    Published(Vec<Action>),
}

/// Summary of a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Files with a registered language.
    pub files: usize,
    pub outcome: SyncOutcome,
}

/// Discover, load and extract every snippet from `source`.
///
/// Returns the number of loaded files and the snippets in file order, then
/// source order within each file.
pub fn collect_snippets(
    source: &dyn FileSource,
    formatter: &dyn Formatter,
) -> Result<(usize, Vec<Snippet>), SyncError> {
    let paths = source.discover().map_err(|e| SyncError::Discovery {
        path: source.root().to_path_buf(),
        source: e,
    })?;

    let files = paths
        .par_iter()
        .filter(|path| is_supported(path))
        .map(|path| {
            let contents = source.read(path).map_err(|e| SyncError::Discovery {
                path: path.clone(),
                source: e,
            })?;
            Ok(LoadedFile::from_contents(path.clone(), contents))
        })
        .collect::<Result<Vec<_>, SyncError>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    tracing::info!(count = files.len(), "loaded files");

    let per_file = files
        .par_iter()
        .map(|file| extract::extract(file, formatter))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((files.len(), per_file.into_iter().flatten().collect()))
}

/// Unsupported files are skipped without being read.
fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| language::resolve(&format!(".{ext}")))
        .is_some()
}

/// Run the whole sync for `opts`.
pub fn run(
    opts: &SyncOptions,
    source: &dyn FileSource,
    store: &dyn RepoStateStore,
    publisher: &dyn PublishPort,
    formatter: &dyn Formatter,
) -> Result<SyncReport, SyncError> {
    let (files, snippets) = collect_snippets(source, formatter)?;
    if snippets.is_empty() {
        tracing::info!("no snippets found");
        return Ok(SyncReport {
            files,
            outcome: SyncOutcome::NoSnippets,
        });
    }

    let path = opts.dump_path.as_str();
    let (stored, previous) = load_dump(store, path, &opts.branch)?;

    if opts.dry_run {
        return Ok(SyncReport {
            files,
            outcome: SyncOutcome::Planned(reconcile::plan(&previous, &snippets)),
        });
    }

    let result = reconcile::reconcile(&previous, &snippets, publisher, opts.concurrency)?;

    let blob = dump::encode(&result.dump).map_err(|source| SyncError::MalformedDump {
        path: path.to_string(),
        source,
    })?;
    store
        .write(
            path,
            &blob,
            stored.as_ref().map(|f| f.sha.as_str()),
            &opts.message,
            &opts.branch,
        )
        .map_err(|e| SyncError::from_store(path, e))?;
    tracing::info!(path, branch = %opts.branch, entries = result.dump.len(), "dump written");

    Ok(SyncReport {
        files,
        outcome: SyncOutcome::Published(result.actions),
    })
}

/// Published URL of snippet `name` according to the dump at `git_ref`.
///
/// `Ok(None)` when the dump does not exist or has no such entry.
pub fn lookup(
    store: &dyn RepoStateStore,
    dump_path: &str,
    git_ref: &str,
    name: &str,
) -> Result<Option<String>, SyncError> {
    let (_, dump) = load_dump(store, dump_path, git_ref)?;
    Ok(dump.lookup(name).map(str::to_string))
}

fn load_dump(
    store: &dyn RepoStateStore,
    path: &str,
    git_ref: &str,
) -> Result<(Option<StoredFile>, Dump), SyncError> {
    let stored = store
        .read(path, git_ref)
        .map_err(|e| SyncError::from_store(path, e))?;
    let dump = dump::decode(stored.as_ref().map(|f| f.content.as_str())).map_err(|source| {
        SyncError::MalformedDump {
            path: path.to_string(),
            source,
        }
    })?;
    tracing::debug!(path, git_ref, entries = dump.len(), existed = stored.is_some(), "loaded dump");
    Ok((stored, dump))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_parses_owner_and_repo() {
        let opts = SyncOptions::from_full_name("maticzav/resk").expect("parse");
        assert_eq!(opts.owner, "maticzav");
        assert_eq!(opts.repo, "resk");
        assert_eq!(opts.branch, "master");
        assert_eq!(opts.dump_path, ".github/resk.json");
        assert_eq!(opts.message, "Resk action paths update.");
    }

    #[test]
    fn full_name_rejects_partial_names() {
        for bad in ["resk", "/resk", "maticzav/", "", "a/b/c"] {
            assert!(SyncOptions::from_full_name(bad).is_none(), "{bad:?}");
        }
    }
}
