//! `resk link`: resolve a snippet name to its gist URL.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use resk_core::dump::DUMP_PATH;
use resk_github::{GitHubClient, DEFAULT_API_URL};
use resk_sync::{
    pipeline::{self, DEFAULT_BRANCH},
    LocalStateStore, SyncOptions,
};

use super::{API_URL_ENV, TOKEN_ENV};

/// Arguments for `resk link`.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Repository holding the dump, as `owner/repo`.
    #[arg(value_name = "OWNER/REPO", value_parser = super::parse_full_name)]
    pub repo: SyncOptions,

    /// Snippet name, e.g. `schema.ts`.
    pub gist: String,

    /// Branch, tag or commit to read the dump from.
    #[arg(long = "ref", default_value = DEFAULT_BRANCH)]
    pub git_ref: String,

    /// Read the dump from this directory instead of the repository.
    #[arg(long, value_name = "DIR")]
    pub local_state: Option<PathBuf>,

    #[arg(long, env = TOKEN_ENV, hide_env_values = true, hide = true)]
    pub token: Option<String>,

    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

impl LinkArgs {
    pub fn run(self) -> Result<()> {
        let SyncOptions { owner, repo, .. } = &self.repo;
        let url = match &self.local_state {
            Some(dir) => {
                let store = LocalStateStore::new(dir);
                pipeline::lookup(&store, DUMP_PATH, &self.git_ref, &self.gist)?
            }
            None => {
                let client = GitHubClient::with_base_url(self.api_url.as_str(), self.token.clone());
                pipeline::lookup(&client.repo(owner, repo), DUMP_PATH, &self.git_ref, &self.gist)?
            }
        };

        let url = url.with_context(|| {
            format!("no gist named '{}' in {owner}/{repo}@{}", self.gist, self.git_ref)
        })?;
        println!("{url}");
        Ok(())
    }
}
