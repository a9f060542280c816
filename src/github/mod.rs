// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Submodules:
// - client: authenticated HTTP client (pagination, retries, rate limits)
// - types: serde models for issues and pull requests
// - issues: lists every issue and separates out pull request numbers
// - pulls: fetches full pull request objects concurrently
// =============================================================================

mod client;
mod issues;
mod pulls;
mod types;

// Re-export the public API so callers can write `github::fetch_issues()`
pub use client::GithubClient;
pub use issues::fetch_issues;
pub use pulls::fetch_pulls;
