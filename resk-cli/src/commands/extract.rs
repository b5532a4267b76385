//! `resk extract`: list the blocks found under a directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use resk_sync::{pipeline, FsSource};

/// Arguments for `resk extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Directory scanned for blocks.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Format snippets with `prettier` instead of only dedenting them.
    #[arg(long)]
    pub prettier: bool,
}

impl ExtractArgs {
    pub fn run(self) -> Result<()> {
        let source = FsSource::new(&self.root);
        let formatter = super::formatter(self.prettier);
        let (files, snippets) = pipeline::collect_snippets(&source, formatter.as_ref())
            .with_context(|| format!("extraction failed under {}", self.root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&snippets).context("failed to serialize snippets")?
            );
            return Ok(());
        }

        println!("Found {files} files, {} gists.", snippets.len());
        for snippet in &snippets {
            println!();
            println!("{}", snippet.name.as_str().bold());
            for line in snippet.source.lines() {
                println!("  {line}");
            }
        }
        Ok(())
    }
}
