//! Resk: publish annotated code regions as gists.
//!
//! # Usage
//!
//! ```text
//! resk sync <owner/repo> [branch] [--root DIR] [--dry-run] [--concurrency N]
//!           [--prettier] [--secret] [--local-state DIR]
//! resk extract [--root DIR] [--json] [--prettier]
//! resk link <owner/repo> <gist> [--ref REF]
//! ```
//!
//! `GH_TOKEN` authenticates gist and contents calls; `RESK_API_URL` points the
//! client at another GitHub API root. Logs go to stderr, filtered by `RUST_LOG`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{extract::ExtractArgs, link::LinkArgs, sync::SyncArgs};

#[derive(Parser, Debug)]
#[command(
    name = "resk",
    version,
    about = "Keep gists in sync with annotated regions of your source code",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract every block and create or update its gist.
    Sync(SyncArgs),

    /// Print the blocks that would be published, without network access.
    Extract(ExtractArgs),

    /// Print the gist URL recorded for a snippet.
    Link(LinkArgs),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Extract(args) => args.run(),
        Commands::Link(args) => args.run(),
    }
}
