// src/github/issues.rs
// =============================================================================
// Lists every issue of a repository.
//
// GitHub's issues endpoint returns pull requests too (they carry a
// `pull_request` field). We keep the plain issues and hand back just the
// numbers of the pull requests so they can be fetched in full afterwards.
// =============================================================================

use tracing::info;

use super::client::GithubClient;
use super::types::Issue;
use crate::error::FetchError;

/// Lists all issues (open and closed, oldest first).
///
/// Returns: (plain issues, pull request numbers), both in listing order
pub async fn fetch_issues(
    client: &GithubClient,
    owner: &str,
    repo: &str,
) -> Result<(Vec<Issue>, Vec<u64>), FetchError> {
    let path = format!("repos/{owner}/{repo}/issues");
    let listing: Vec<Issue> = client
        .get_all(
            &path,
            &[("state", "all"), ("direction", "asc"), ("per_page", "100")],
        )
        .await?;

    let (issues, pull_numbers) = partition_issues(listing);
    info!(
        issues = issues.len(),
        pulls = pull_numbers.len(),
        "listed repository issues"
    );
    Ok((issues, pull_numbers))
}

/// Splits an issue listing into plain issues and pull request numbers
pub fn partition_issues(listing: Vec<Issue>) -> (Vec<Issue>, Vec<u64>) {
    let (pulls, issues): (Vec<_>, Vec<_>) =
        listing.into_iter().partition(Issue::is_pull_request);
    (issues, pulls.into_iter().map(|p| p.number).collect())
}
