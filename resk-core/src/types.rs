//! Domain types shared by the extractor, the dump codec and the reconciler.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Publication key of a snippet: the declared label followed by the file
/// extension it was extracted from (e.g. `schema.ts`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetName(pub String);

impl SnippetName {
    /// Build the publication key for `label` found in a file with `extension`.
    pub fn from_label(label: &str, extension: &str) -> Self {
        Self(format!("{label}{extension}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnippetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SnippetName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SnippetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A named, formatted unit of text ready for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub name: SnippetName,
    /// Formatted source, without the delimiter comments.
    pub source: String,
}

/// Identifiers of a published snippet on the hosting service.
///
/// Field names follow the persisted dump layout (`id`, `html_url`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    pub id: String,
    pub html_url: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
