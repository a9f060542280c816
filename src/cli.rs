// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The four required inputs mirror the classic invocation:
//
//     github-data-fetch -O <owner> -r <repo> -t <token> -o <output-directory>
//
// Everything else is optional tuning (output format, throttling, retries).
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "github-data-fetch",
    version,
    about = "Fetch every issue and pull request of a GitHub repository",
    long_about = "github-data-fetch downloads all issues and pull requests of a repository through \
                  the GitHub REST API and writes them to <output-directory>/<owner>/<repo>/."
)]
pub struct Cli {
    /// Repository owner to fetch data for
    #[arg(short = 'O', long)]
    pub owner: String,

    /// Repository name to fetch data for
    #[arg(short = 'r', long = "repository")]
    pub repo: String,

    /// GitHub API token to use
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Directory to output the data to
    #[arg(short = 'o', long = "output-directory")]
    pub output_directory: PathBuf,

    /// Serialization format of the written files
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Msgpack)]
    pub format: Format,

    /// Base url of the GitHub API (set this for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum pull request fetches started per second
    #[arg(long, default_value_t = 20)]
    pub requests_per_second: u32,

    /// Maximum pull request fetches in flight at once
    #[arg(long, default_value_t = 20)]
    pub concurrency: usize,

    /// Retries for transient network / server errors on each request
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// How many times a single request may wait out a rate limit
    #[arg(long, default_value_t = 5)]
    pub max_rate_limit_waits: u32,

    /// Only fetch issues, skip pull requests
    #[arg(long)]
    pub issues_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Msgpack,
    Json,
}
