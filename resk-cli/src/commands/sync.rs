//! `resk sync`: publish every block and update the dump.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use resk_github::{GitHubClient, DEFAULT_API_URL};
use resk_sync::{
    pipeline, reconcile::DEFAULT_CONCURRENCY, Action, FsSource, LocalStateStore, Planned,
    RepoStateStore, SyncOptions, SyncOutcome,
};

use super::{API_URL_ENV, TOKEN_ENV};

const SUGGESTION: &str =
    "SUGGESTION: make sure your GH_TOKEN has access to Gist and can write to your repository!";

/// Arguments for `resk sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Repository holding the dump, as `owner/repo`.
    #[arg(value_name = "OWNER/REPO", value_parser = super::parse_full_name)]
    pub repo: SyncOptions,

    /// Branch the dump is read from and committed to.
    pub branch: Option<String>,

    /// Directory scanned for blocks.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Show what would be published without publishing or committing.
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum gist requests in flight.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Format snippets with `prettier` instead of only dedenting them.
    #[arg(long)]
    pub prettier: bool,

    /// Create secret gists.
    #[arg(long)]
    pub secret: bool,

    /// Keep the dump in this directory instead of the repository.
    #[arg(long, value_name = "DIR")]
    pub local_state: Option<PathBuf>,

    /// Commit message for the dump update.
    #[arg(long)]
    pub message: Option<String>,

    #[arg(long, env = TOKEN_ENV, hide_env_values = true, hide = true)]
    pub token: Option<String>,

    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let result = self.execute();
        if result.is_err() {
            eprintln!("{}", SUGGESTION.yellow());
        }
        result
    }

    fn options(&self) -> SyncOptions {
        let mut opts = self.repo.clone();
        if let Some(branch) = &self.branch {
            opts.branch = branch.clone();
        }
        if let Some(message) = &self.message {
            opts.message = message.clone();
        }
        opts.concurrency = self.concurrency;
        opts.dry_run = self.dry_run;
        opts
    }

    fn execute(&self) -> Result<()> {
        let offline = self.dry_run && self.local_state.is_some();
        if self.token.is_none() && !offline {
            bail!("{TOKEN_ENV} is not set");
        }

        let opts = self.options();
        let client = GitHubClient::with_base_url(self.api_url.as_str(), self.token.clone());
        let client = if self.secret { client.secret_gists() } else { client };

        let local;
        let remote;
        let store: &dyn RepoStateStore = match &self.local_state {
            Some(dir) => {
                local = LocalStateStore::new(dir);
                &local
            }
            None => {
                remote = client.repo(&opts.owner, &opts.repo);
                &remote
            }
        };

        tracing::debug!(
            repo = %format!("{}/{}", opts.owner, opts.repo),
            branch = %opts.branch,
            local = self.local_state.is_some(),
            "starting sync"
        );
        let source = FsSource::new(&self.root);
        let formatter = super::formatter(self.prettier);
        let report = pipeline::run(&opts, &source, store, &client, formatter.as_ref())
            .with_context(|| format!("sync failed for {}/{}", opts.owner, opts.repo))?;

        println!("Found {} files.", report.files);
        match report.outcome {
            SyncOutcome::NoSnippets => println!("Found no gists."),
            SyncOutcome::Planned(planned) => print_planned(&planned),
            SyncOutcome::Published(actions) => print_published(&actions),
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct GistRow {
    #[tabled(rename = "gist")]
    name: String,
    #[tabled(rename = "operation")]
    operation: String,
    #[tabled(rename = "url")]
    url: String,
}

fn print_planned(planned: &[Planned]) {
    println!("[dry-run] Would upload {} gists:", planned.len());
    let rows = planned.iter().map(|p| GistRow {
        name: p.snippet.name.to_string(),
        operation: p.operation().to_string(),
        url: p
            .existing
            .as_ref()
            .map_or_else(|| "-".to_string(), |r| r.html_url.clone()),
    });
    print_table(rows);
}

fn print_published(actions: &[Action]) {
    println!("Uploaded {} gists:", actions.len());
    let rows = actions.iter().map(|a| GistRow {
        name: a.snippet.name.to_string(),
        operation: a.operation.to_string(),
        url: a.remote.html_url.clone(),
    });
    print_table(rows);
}

fn print_table(rows: impl IntoIterator<Item = GistRow>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
