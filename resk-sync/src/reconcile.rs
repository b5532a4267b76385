//! Reconciliation: decide create vs update per snippet, publish, and fold
//! the results into the next dump.
//!
//! Entries of the previous dump whose snippet is no longer extracted are kept:
//! their links may still be shared, so nothing is ever removed here.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use resk_core::{Dump, RemoteRef, Snippet};

use crate::error::SyncError;
use crate::ports::PublishPort;

/// Publish calls in flight at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What happens to a snippet on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
        }
    }
}

/// A candidate classified against the previous dump, not yet published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Planned {
    pub snippet: Snippet,
    /// Entry of the previous dump with the same name, if any.
    pub existing: Option<RemoteRef>,
}

impl Planned {
    pub fn operation(&self) -> Operation {
        if self.existing.is_some() {
            Operation::Update
        } else {
            Operation::Create
        }
    }
}

/// A published snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub snippet: Snippet,
    pub operation: Operation,
    pub remote: RemoteRef,
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Previous dump with every published snippet folded in.
    pub dump: Dump,
    /// One action per candidate, in candidate order.
    pub actions: Vec<Action>,
}

/// Classify `candidates` against `previous` without calling the host.
pub fn plan(previous: &Dump, candidates: &[Snippet]) -> Vec<Planned> {
    candidates
        .iter()
        .map(|snippet| Planned {
            existing: previous.get(&snippet.name).cloned(),
            snippet: snippet.clone(),
        })
        .collect()
}

/// Publish every candidate and build the next dump.
///
/// At most `concurrency` publish calls run at once (values below 1 mean 1).
/// The first failure aborts the reconciliation and no dump is produced.
/// When two candidates share a name, the later one's result is kept.
pub fn reconcile(
    previous: &Dump,
    candidates: &[Snippet],
    publisher: &dyn PublishPort,
    concurrency: usize,
) -> Result<Reconciliation, SyncError> {
    if candidates.is_empty() {
        return Ok(Reconciliation {
            dump: previous.clone(),
            actions: Vec::new(),
        });
    }

    let planned = plan(previous, candidates);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()?;
    let actions = pool.install(|| {
        planned
            .into_par_iter()
            .map(|p| publish(p, publisher))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut dump = previous.clone();
    for action in &actions {
        dump.insert(action.snippet.name.clone(), action.remote.clone());
    }
    Ok(Reconciliation { dump, actions })
}

fn publish(planned: Planned, publisher: &dyn PublishPort) -> Result<Action, SyncError> {
    let operation = planned.operation();
    let Planned { snippet, existing } = planned;

    let result = match &existing {
        Some(remote) => publisher.update(&remote.id, &snippet.name, &snippet.source),
        None => publisher.create(&snippet.name, &snippet.source),
    };
    let remote = result.map_err(|source| SyncError::Publish {
        name: snippet.name.clone(),
        operation,
        source,
    })?;

    tracing::info!(name = %snippet.name, %operation, url = %remote.html_url, "published snippet");
    Ok(Action {
        snippet,
        operation,
        remote,
    })
}
