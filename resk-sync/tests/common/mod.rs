//! In-memory port fakes shared by the pipeline tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use resk_core::{RemoteRef, SnippetName};
use resk_sync::{BoxError, Operation, PublishPort, RepoStateStore, StoreError, StoredFile};

/// Records every publish call and hands out sequential gist ids.
#[derive(Default)]
pub struct MemoryPublisher {
    pub calls: Mutex<Vec<(Operation, String, String)>>,
    next_id: AtomicUsize,
    pub fail_on: Option<String>,
}

impl MemoryPublisher {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn count(&self, op: Operation) -> usize {
        self.calls.lock().unwrap().iter().filter(|(o, _, _)| *o == op).count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, op: Operation, id: Option<&str>, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((op, name.to_string(), source.to_string()));
        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(format!("cannot publish {name}").into());
        }
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("gist{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        Ok(RemoteRef {
            html_url: format!("https://gist.github.com/{id}"),
            id,
        })
    }
}

impl PublishPort for MemoryPublisher {
    fn create(&self, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError> {
        self.respond(Operation::Create, None, name, source)
    }

    fn update(&self, id: &str, name: &SnippetName, source: &str) -> Result<RemoteRef, BoxError> {
        self.respond(Operation::Update, Some(id), name, source)
    }
}

/// A single-file store; optionally reports a conflict on every write.
#[derive(Default)]
pub struct MemoryStore {
    pub file: Mutex<Option<StoredFile>>,
    pub writes: AtomicUsize,
    pub conflict_on_write: bool,
}

impl MemoryStore {
    pub fn with_content(content: &str) -> Self {
        Self {
            file: Mutex::new(Some(StoredFile {
                content: content.to_string(),
                sha: "sha-0".to_string(),
            })),
            ..Self::default()
        }
    }

    pub fn conflicting() -> Self {
        Self {
            conflict_on_write: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RepoStateStore for MemoryStore {
    fn read(&self, _path: &str, _git_ref: &str) -> Result<Option<StoredFile>, StoreError> {
        Ok(self.file.lock().unwrap().clone())
    }

    fn write(
        &self,
        path: &str,
        content: &str,
        prior_sha: Option<&str>,
        _message: &str,
        _git_ref: &str,
    ) -> Result<(), StoreError> {
        if self.conflict_on_write {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        let mut file = self.file.lock().unwrap();
        if file.as_ref().map(|f| f.sha.as_str()) != prior_sha {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        *file = Some(StoredFile {
            content: content.to_string(),
            sha: format!("sha-{n}"),
        });
        Ok(())
    }
}
