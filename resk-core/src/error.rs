//! Error types for resk-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a [`Formatter`](crate::extract::Formatter) on a captured block.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The external formatter could not be started or fed.
    #[error("failed to run formatter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external formatter exited non-zero (usually a syntax error in the block).
    #[error("formatter `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The formatter produced output that is not valid UTF-8.
    #[error("formatter `{program}` produced non UTF-8 output")]
    InvalidOutput { program: String },
}

/// All errors that can arise while loading files and extracting snippets.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source file could not be read or is not valid UTF-8 text.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting a captured block failed; the whole file is rejected.
    #[error("failed to format block \"{label}\" in {path}: {source}")]
    Format {
        path: PathBuf,
        label: String,
        #[source]
        source: FormatError,
    },
}

/// A persisted dump could not be decoded. Never recovered from silently.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("malformed dump: invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed dump: not UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Wrong JSON shape on decode, or a serialization failure on encode.
    #[error("malformed dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`ExtractError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ExtractError {
    ExtractError::Io {
        path: path.into(),
        source,
    }
}
