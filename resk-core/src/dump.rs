//! Dump codec: the persisted `snippet name → remote ids` mapping.
//!
//! On the wire the dump is a JSON object, base64-encoded for the repository
//! contents API:
//!
//! ```json
//! { "schema.ts": { "id": "aa5a315d61ae9438b18d", "html_url": "https://gist.github.com/aa5a315d61ae9438b18d" } }
//! ```

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::DumpError;
use crate::types::{RemoteRef, SnippetName};

/// Repository path the dump is stored at.
pub const DUMP_PATH: &str = ".github/resk.json";

/// Mapping from snippet name to its published identifiers. Keys are unique;
/// inserting an existing name replaces its entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dump {
    entries: BTreeMap<SnippetName, RemoteRef>,
}

impl Dump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &SnippetName) -> Option<&RemoteRef> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &SnippetName) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or replace the entry for `name`, returning the previous one.
    pub fn insert(&mut self, name: SnippetName, remote: RemoteRef) -> Option<RemoteRef> {
        self.entries.insert(name, remote)
    }

    /// Published URL for a snippet name given as plain text.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&SnippetName::from(name))
            .map(|remote| remote.html_url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&SnippetName, &RemoteRef)> {
        self.entries.iter()
    }
}

impl FromIterator<(SnippetName, RemoteRef)> for Dump {
    fn from_iter<I: IntoIterator<Item = (SnippetName, RemoteRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Serialize `dump` to JSON and base64-encode it.
pub fn encode(dump: &Dump) -> Result<String, DumpError> {
    let json = serde_json::to_string(dump)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Decode a transport blob. An absent blob is an empty dump; anything that is
/// not base64 of a JSON `name → {id, html_url}` object is an error.
///
/// Whitespace inside the blob is ignored (the contents API wraps base64 lines).
pub fn decode(blob: Option<&str>) -> Result<Dump, DumpError> {
    let Some(blob) = blob else {
        return Ok(Dump::new());
    };
    let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}
