//! # resk-github
//!
//! GitHub backends for resk: gists as the snippet host and the repository
//! contents API as the dump store.
//!
//! ```rust,no_run
//! use resk_github::GitHubClient;
//!
//! let client = GitHubClient::new(std::env::var("GH_TOKEN").ok());
//! let store = client.repo("maticzav", "resk");
//! # let _ = store;
//! ```

pub mod client;
pub mod error;
pub mod ports;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use error::GitHubError;
pub use ports::RepoContents;
