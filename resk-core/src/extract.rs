//! Block extraction: turns the text of a source file into named, formatted
//! [`Snippet`]s.
//!
//! A block is the text between a start marker carrying a label and the nearest
//! following end marker:
//!
//! ```text
//! /* resk start "schema" */
//! const typeDefs = `...`
//! /* resk end */
//! ```
//!
//! Blocks with the same marker pair do not nest: a second start marker inside a
//! block is plain body text and the first end marker closes the block. A start
//! marker with no end marker after it is ignored, along with everything behind it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{io_err, ExtractError, FormatError};
use crate::language::{self, Language, Markers};
use crate::types::{Snippet, SnippetName};

// ---------------------------------------------------------------------------
// Loaded files
// ---------------------------------------------------------------------------

/// A source file whose extension resolved to a registered [`Language`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    /// Extension including the leading dot, e.g. `.ts`.
    pub extension: String,
    pub contents: String,
    pub language: Language,
}

impl LoadedFile {
    /// Wrap already-read `contents`. Returns `None` for unsupported extensions.
    pub fn from_contents(path: impl Into<PathBuf>, contents: String) -> Option<Self> {
        let path = path.into();
        let extension = extension_of(&path)?;
        let language = language::resolve(&extension)?;
        Some(Self {
            path,
            extension,
            contents,
            language,
        })
    }

    /// Read `path` from disk. Unsupported extensions are skipped (`Ok(None)`)
    /// without touching the file; unreadable or non UTF-8 files are errors.
    pub fn read(path: &Path) -> Result<Option<Self>, ExtractError> {
        if extension_of(path).and_then(|ext| language::resolve(&ext)).is_none() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Ok(Self::from_contents(path, contents))
    }

    /// Iterate over the raw blocks of this file.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(&self.contents, self.language)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// A delimited region, borrowed from the file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Label declared in the start marker.
    pub label: &'a str,
    /// Text between the end of the start marker and the start of the end marker.
    pub body: &'a str,
    /// 1-based line of the start marker.
    pub start_line: usize,
}

/// Output of a language's block projector, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSnippet {
    pub label: String,
    pub source: String,
}

/// Lazy iterator over the blocks of a text. Clone it to restart from the
/// same position.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    text: &'a str,
    markers: &'static Markers,
    cursor: usize,
    /// Line number of byte offset `line_pos`, counted incrementally.
    line: usize,
    line_pos: usize,
    done: bool,
}

impl<'a> Blocks<'a> {
    pub fn new(text: &'a str, language: Language) -> Self {
        Self {
            text,
            markers: language.markers(),
            cursor: 0,
            line: 1,
            line_pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let text = self.text;

        let Some(open) = self.markers.start.captures_at(text, self.cursor) else {
            self.done = true;
            return None;
        };
        let (Some(whole), Some(label)) = (open.get(0), open.get(1)) else {
            self.done = true;
            return None;
        };

        // Nearest end marker wins; no end marker means no more blocks.
        let Some(close) = self.markers.end.find_at(text, whole.end()) else {
            self.done = true;
            return None;
        };
        self.cursor = close.end();
        self.line += text[self.line_pos..whole.start()].matches('\n').count();
        self.line_pos = whole.start();

        Some(RawBlock {
            label: label.as_str(),
            body: &text[whole.end()..close.start()],
            start_line: self.line,
        })
    }
}

impl std::iter::FusedIterator for Blocks<'_> {}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

/// Formats the raw source of a block. `file` is the enclosing file, so the
/// formatter can pick a dialect.
pub trait Formatter: Send + Sync {
    fn format(&self, source: &str, file: &LoadedFile) -> Result<String, FormatError>;
}

/// Built-in formatter: trims blank lines around the block, strips trailing
/// whitespace and the indentation common to every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dedent;

impl Formatter for Dedent {
    fn format(&self, source: &str, _file: &LoadedFile) -> Result<String, FormatError> {
        Ok(dedent(source))
    }
}

/// Remove surrounding blank lines and common leading indentation.
///
/// The result ends with exactly one newline, or is empty for a blank block.
pub fn dedent(source: &str) -> String {
    let lines: Vec<&str> = source.lines().map(str::trim_end).collect();
    let Some(first) = lines.iter().position(|l| !l.is_empty()) else {
        return String::new();
    };
    let last = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(first);
    let body = &lines[first..=last];

    let indent = body
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| leading_whitespace(l))
        .reduce(common_prefix)
        .map_or(0, str::len);

    let mut out = String::with_capacity(source.len());
    for line in body {
        if !line.is_empty() {
            out.push_str(&line[indent..]);
        }
        out.push('\n');
    }
    out
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..end]
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Pipes the block through the `prettier` CLI with resk's house style
/// (no semicolons, trailing commas, single quotes).
///
/// Languages prettier does not understand fall back to [`Dedent`].
#[derive(Debug, Clone)]
pub struct Prettier {
    program: String,
}

impl Prettier {
    /// Use `prettier` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("prettier")
    }

    /// Use a specific executable (e.g. `node_modules/.bin/prettier`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Prettier {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for Prettier {
    fn format(&self, source: &str, file: &LoadedFile) -> Result<String, FormatError> {
        let Some(parser) = file.language.prettier_parser() else {
            return Dedent.format(source, file);
        };

        let spawn_err = |source: std::io::Error| FormatError::Spawn {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(["--parser", parser])
            .args(["--no-semi", "--trailing-comma", "all", "--single-quote"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidOutput {
            program: self.program.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// extract
// ---------------------------------------------------------------------------

/// Extract every block of `file` as a formatted snippet, in source order.
///
/// Fails on the first block the formatter rejects; no partial result is returned.
pub fn extract(file: &LoadedFile, formatter: &dyn Formatter) -> Result<Vec<Snippet>, ExtractError> {
    file.blocks()
        .map(|block| {
            let raw = file.language.project(&block);
            tracing::debug!(
                path = %file.path.display(),
                line = block.start_line,
                label = %raw.label,
                "found block"
            );
            let source = formatter
                .format(&raw.source, file)
                .map_err(|source| ExtractError::Format {
                    path: file.path.clone(),
                    label: raw.label.clone(),
                    source,
                })?;
            Ok(Snippet {
                name: SnippetName::from_label(&raw.label, &file.extension),
                source,
            })
        })
        .collect()
}
