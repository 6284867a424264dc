use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::badges::NamePolicy;
use crate::catalog::DEFAULT_SIZE;

/// Scrape Twitch global badges into a JSON badge file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape the badge listing and write the badge file (default)
    Scrape(ScrapeArgs),
    /// Look up image URLs for a chat `badges` tag in an existing badge file
    Resolve(ResolveArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Scrape(ScrapeArgs::default())
    }
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeArgs {
    /// Name cleanup policy, overrides config
    #[arg(long, value_enum, ignore_case = true)]
    pub policy: Option<NamePolicy>,
    /// Badge file to write, overrides config
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Run the browser without a window; `--headless=false` forces a visible
    /// window even when config enables headless mode
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub headless: Option<bool>,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Tag value such as `moderator/1,subscriber/12`
    #[arg(long)]
    pub tag: String,
    /// Image size substituted for `{SIZE}`
    #[arg(long, default_value = DEFAULT_SIZE)]
    pub size: String,
    /// Badge file to read, defaults to the configured output path
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Colored, human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
