// src/config.rs
// =============================================================================
// Turns the raw command-line arguments into a validated Config.
//
// clap already guarantees the required flags are present; this layer checks
// the values themselves (no empty owner, a parseable API url, non-zero limits).
// =============================================================================

use std::path::PathBuf;

use url::Url;

use crate::cli::{Cli, Format};
use crate::error::ConfigError;

/// Serialization format of the written datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    MsgPack,
    Json,
}

impl OutputFormat {
    /// File extension used for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::MsgPack => "msgpack",
            OutputFormat::Json => "json",
        }
    }
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Msgpack => OutputFormat::MsgPack,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub output_directory: PathBuf,
    pub format: OutputFormat,
    pub api_url: Url,
    pub requests_per_second: u32,
    pub concurrency: usize,
    pub max_retries: u32,
    pub max_rate_limit_waits: u32,
    pub issues_only: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        validate_name("owner", &cli.owner)?;
        validate_name("repository", &cli.repo)?;

        if cli.token.trim().is_empty() {
            return Err(ConfigError::Empty { field: "token" });
        }
        if cli.requests_per_second == 0 {
            return Err(ConfigError::Zero {
                field: "requests-per-second",
            });
        }
        if cli.concurrency == 0 {
            return Err(ConfigError::Zero {
                field: "concurrency",
            });
        }

        Ok(Config {
            owner: cli.owner,
            repo: cli.repo,
            token: cli.token,
            output_directory: cli.output_directory,
            format: cli.format.into(),
            api_url: parse_api_url(&cli.api_url)?,
            requests_per_second: cli.requests_per_second,
            concurrency: cli.concurrency,
            max_retries: cli.max_retries,
            max_rate_limit_waits: cli.max_rate_limit_waits,
            issues_only: cli.issues_only,
        })
    }

    /// Where this repository's files go: `<output>/<owner>/<repo>`
    pub fn repo_output_dir(&self) -> PathBuf {
        self.output_directory.join(&self.owner).join(&self.repo)
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

// The base must end in '/' or Url::join would drop its last path segment
// (matters for GitHub Enterprise bases like https://host/api/v3).
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|_| ConfigError::InvalidApiUrl(raw.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
