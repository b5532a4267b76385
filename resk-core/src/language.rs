//! Language registry: [`Language`] enum and extension lookup.
//!
//! # Supported languages
//!
//! | Language   | Extensions     | Start marker               | End marker       |
//! |------------|----------------|----------------------------|------------------|
//! | TypeScript | `.ts`, `.tsx`  | `/* resk start "<label>" */` | `/* resk end */` |
//! | JavaScript | `.js`, `.jsx`  | `/* resk start "<label>" */` | `/* resk end */` |
//! | Rust       | `.rs`          | `/* resk start "<label>" */` | `/* resk end */` |
//!
//! Adding a language means adding a variant and filling in every `match` below.
//! Extension sets must stay disjoint across variants.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::{RawBlock, RawSnippet};

// ---------------------------------------------------------------------------
// Marker patterns
// ---------------------------------------------------------------------------

const BLOCK_COMMENT_START: &str = r#"/\*\s*resk start\s+"(.+?)"\s*\*/"#;
const BLOCK_COMMENT_END: &str = r"/\*\s*resk end\s*\*/";

/// Compiled start/end markers of a language.
#[derive(Debug)]
pub struct Markers {
    /// Opening marker; capture group 1 is the declared label.
    pub start: Regex,
    /// Closing marker.
    pub end: Regex,
}

static BLOCK_COMMENT_MARKERS: LazyLock<Markers> = LazyLock::new(|| Markers {
    start: Regex::new(BLOCK_COMMENT_START).expect("Invalid start marker regex"),
    end: Regex::new(BLOCK_COMMENT_END).expect("Invalid end marker regex"),
});

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// All languages resk can extract blocks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Rust,
}

impl Language {
    /// All language variants in a stable order.
    pub fn all() -> &'static [Language] {
        &[Language::TypeScript, Language::JavaScript, Language::Rust]
    }

    /// Human-readable name, used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Rust => "rust",
        }
    }

    /// File extensions (with the leading dot) handled by this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &[".ts", ".tsx"],
            Language::JavaScript => &[".js", ".jsx"],
            Language::Rust => &[".rs"],
        }
    }

    /// Start and end markers bounding a block.
    pub fn markers(&self) -> &'static Markers {
        match self {
            Language::TypeScript | Language::JavaScript | Language::Rust => {
                &BLOCK_COMMENT_MARKERS
            }
        }
    }

    /// Parser name passed to `prettier --parser`, if prettier understands the language.
    pub fn prettier_parser(&self) -> Option<&'static str> {
        match self {
            Language::TypeScript => Some("typescript"),
            Language::JavaScript => Some("babel"),
            Language::Rust => None,
        }
    }

    /// Project a raw block onto the label and unformatted source of a snippet.
    pub fn project(&self, block: &RawBlock<'_>) -> RawSnippet {
        match self {
            Language::TypeScript | Language::JavaScript | Language::Rust => RawSnippet {
                label: block.label.to_string(),
                source: block.body.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Return the language handling `extension` (e.g. `".tsx"`), if any.
pub fn resolve(extension: &str) -> Option<Language> {
    Language::all()
        .iter()
        .copied()
        .find(|lang| lang.extensions().contains(&extension))
}

/// Every registered extension, in registry order.
pub fn list_extensions() -> Vec<&'static str> {
    Language::all()
        .iter()
        .flat_map(|lang| lang.extensions().iter().copied())
        .collect()
}

/// Turn extensions into recursive glob patterns (`.ts` → `**/*.ts`).
pub fn globs_from_extensions(extensions: &[&str]) -> Vec<String> {
    extensions.iter().map(|ext| format!("**/*{ext}")).collect()
}
