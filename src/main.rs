// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and validate them into a Config
// 2. List every issue of the repository (pull requests come back too)
// 3. Write the plain issues to <output>/<owner>/<repo>/issues.<ext>
// 4. Fetch each pull request in full, throttled, and write pulls.<ext>
// 5. Exit with proper code (0 = success, 1 = error; clap uses 2 for bad usage)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated settings
mod error; // src/error.rs - typed errors
mod github; // src/github/ - GitHub API access
mod output; // src/output.rs - writing datasets to disk
mod throttle; // src/throttle.rs - request rate limiting

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use github::GithubClient;
use throttle::Throttle;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries the progress summary.
// RUST_LOG overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = Config::from_cli(cli).context("invalid arguments")?;
    let client = GithubClient::new(&cfg).context("failed to set up the GitHub client")?;
    let out_dir = cfg.repo_output_dir();

    println!("🔍 Fetching {}/{} from {}", cfg.owner, cfg.repo, cfg.api_url);

    let (issues, pull_numbers) = github::fetch_issues(&client, &cfg.owner, &cfg.repo)
        .await
        .with_context(|| format!("failed to list issues of {}/{}", cfg.owner, cfg.repo))?;

    println!("📄 Issues: {}", issues.len());
    let path = output::write_dataset(&out_dir, "issues", cfg.format, &issues)
        .context("failed to write issues")?;
    println!("   written to {}", path.display());

    if cfg.issues_only {
        info!(skipped = pull_numbers.len(), "skipping pull requests");
        return Ok(());
    }

    println!("🔀 Pulls: {}", pull_numbers.len());
    let throttle = Throttle::new(cfg.requests_per_second, Duration::from_secs(1));
    info!(
        interval_ms = throttle.interval().as_millis() as u64,
        concurrency = cfg.concurrency,
        "fetching pull requests"
    );

    let pulls = github::fetch_pulls(
        &client,
        &cfg.owner,
        &cfg.repo,
        pull_numbers,
        &throttle,
        cfg.concurrency,
    )
    .await
    .with_context(|| format!("failed to fetch pull requests of {}/{}", cfg.owner, cfg.repo))?;

    let path = output::write_dataset(&out_dir, "pulls", cfg.format, &pulls)
        .context("failed to write pull requests")?;
    println!("   written to {}", path.display());

    println!("✅ Done");
    Ok(())
}
