//! resk core library: language registry, block extraction, dump codec.
//!
//! Public API surface:
//! - [`language`]: [`Language`] registry and extension lookup
//! - [`extract`]: block tokenizer, [`Formatter`]s and [`extract()`](extract::extract)
//! - [`dump`]: [`Dump`] and its base64/JSON codec
//! - [`types`]: snippet and remote identifier types
//! - [`error`]: [`ExtractError`], [`FormatError`], [`DumpError`]

pub mod dump;
pub mod error;
pub mod extract;
pub mod language;
pub mod types;

pub use dump::Dump;
pub use error::{DumpError, ExtractError, FormatError};
pub use extract::{Dedent, Formatter, LoadedFile, Prettier};
pub use language::Language;
pub use types::{RemoteRef, Snippet, SnippetName};
