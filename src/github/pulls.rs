// src/github/pulls.rs
// =============================================================================
// Fetches full pull request objects by number.
//
// The issue listing only tells us which numbers are pull requests; details
// such as head/base refs, merge state and diff stats need one request per
// pull. Those requests run concurrently (up to `concurrency` at once) and
// each one first takes a slot from the shared throttle.
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::client::GithubClient;
use super::types::Pull;
use crate::error::FetchError;
use crate::throttle::Throttle;

/// Fetches every pull request in `numbers`.
///
/// Fails on the first error. The result is sorted by pull request number.
pub async fn fetch_pulls(
    client: &GithubClient,
    owner: &str,
    repo: &str,
    numbers: Vec<u64>,
    throttle: &Throttle,
    concurrency: usize,
) -> Result<Vec<Pull>, FetchError> {
    let requests = numbers.into_iter().map(move |number| async move {
        throttle.acquire().await;
        debug!(number, "fetching pull request");
        client
            .get_one::<Pull>(&format!("repos/{owner}/{repo}/pulls/{number}"))
            .await
    });

    let mut pulls: Vec<Pull> = stream::iter(requests)
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    pulls.sort_by_key(|p| p.number);
    Ok(pulls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::tests::test_config;
    use std::time::Duration;

    fn pull_json(number: u64) -> String {
        format!(
            r#"{{"id": {}, "number": {number}, "state": "open", "title": "pull {number}",
                "created_at": "2021-03-04T05:06:07Z", "updated_at": "2021-03-04T05:06:07Z",
                "head": {{"label": "u:feature", "ref": "feature", "sha": "aaa"}},
                "base": {{"label": "o:main", "ref": "main", "sha": "bbb"}}}}"#,
            number + 5000
        )
    }

    #[tokio::test]
    async fn test_fetch_pulls_sorted() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for number in [5, 2, 9] {
            let mock = server
                .mock("GET", format!("/repos/o/r/pulls/{number}").as_str())
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(pull_json(number))
                .create_async()
                .await;
            mocks.push(mock);
        }

        let client = GithubClient::new(&test_config(&server.url())).unwrap();
        let throttle = Throttle::new(1000, Duration::from_secs(1));
        let pulls = fetch_pulls(&client, "o", "r", vec![5, 2, 9], &throttle, 2)
            .await
            .unwrap();

        assert_eq!(pulls.iter().map(|p| p.number).collect::<Vec<_>>(), vec![2, 5, 9]);
        assert_eq!(pulls[0].base.git_ref, "main");
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_pulls_fails_on_missing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/pulls/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(pull_json(1))
            .create_async()
            .await;
        server
            .mock("GET", "/repos/o/r/pulls/2")
            .with_status(404)
            .create_async()
            .await;

        let client = GithubClient::new(&test_config(&server.url())).unwrap();
        let throttle = Throttle::new(1000, Duration::from_secs(1));
        let err = fetch_pulls(&client, "o", "r", vec![1, 2], &throttle, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_no_pulls() {
        let client = GithubClient::new(&test_config("http://127.0.0.1:9")).unwrap();
        let throttle = Throttle::new(1, Duration::from_secs(1));
        let pulls = fetch_pulls(&client, "o", "r", Vec::new(), &throttle, 1)
            .await
            .unwrap();
        assert!(pulls.is_empty());
    }
}
