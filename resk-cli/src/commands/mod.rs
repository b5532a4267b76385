pub mod extract;
pub mod link;
pub mod sync;

use resk_core::{Dedent, Formatter, Prettier};
use resk_sync::SyncOptions;

/// Environment variable holding the GitHub token.
pub const TOKEN_ENV: &str = "GH_TOKEN";

/// Environment variable overriding the GitHub API root.
pub const API_URL_ENV: &str = "RESK_API_URL";

/// `prettier` when asked for, the built-in dedent otherwise.
pub fn formatter(prettier: bool) -> Box<dyn Formatter> {
    if prettier {
        Box::new(Prettier::new())
    } else {
        Box::new(Dedent)
    }
}

/// Parse `owner/repo` for clap.
pub fn parse_full_name(value: &str) -> Result<SyncOptions, String> {
    SyncOptions::from_full_name(value)
        .ok_or_else(|| format!("expected <owner>/<repo>, got '{value}'"))
}
