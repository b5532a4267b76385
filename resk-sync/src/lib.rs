//! # resk-sync
//!
//! Reconciliation of extracted snippets against the persisted dump, and the
//! pipeline that drives discovery, extraction, publishing and persistence.
//!
//! Call [`pipeline::run`] with a [`FileSource`], a [`RepoStateStore`] and a
//! [`PublishPort`]; use [`reconcile::reconcile`] directly for the core diff.

pub mod discover;
pub mod error;
pub mod local_store;
pub mod pipeline;
pub mod ports;
pub mod reconcile;

pub use discover::FsSource;
pub use error::{BoxError, StoreError, SyncError};
pub use local_store::LocalStateStore;
pub use pipeline::{SyncOptions, SyncOutcome, SyncReport};
pub use ports::{FileSource, PublishPort, RepoStateStore, StoredFile};
pub use reconcile::{Action, Operation, Planned, Reconciliation};
