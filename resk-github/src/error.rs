//! Error types for resk-github.

use thiserror::Error;

/// All errors that can arise from GitHub API calls.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a non-success status.
    #[error("GitHub returned {status} for {method} {url}: {message}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },

    /// The request never got a response (DNS, TLS, connection reset, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body was not the JSON we expected.
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl GitHubError {
    /// HTTP status of a [`GitHubError::Status`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
