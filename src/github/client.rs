// src/github/client.rs
// =============================================================================
// An authenticated client for the GitHub REST API.
//
// Responsibilities:
// - Sends the token, user agent and API version headers with every request
// - Retries transient failures (connection resets, 5xx) with exponential
//   backoff via reqwest-retry
// - Waits out rate limits (403/429 with Retry-After or X-RateLimit-Remaining: 0)
//   and then tries the same request again
// - Follows `Link: <...>; rel="next"` headers to walk paginated listings
// =============================================================================

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use reqwest_retry::{
    default_on_request_failure, default_on_request_success, policies::ExponentialBackoff,
    RetryTransientMiddleware, Retryable, RetryableStrategy,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::FetchError;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Used when GitHub signals a rate limit but gives no reset time
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// One page of a paginated listing
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest_middleware::ClientWithMiddleware,
    api_url: Url,
    max_rate_limit_waits: u32,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| FetchError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = reqwest_middleware::ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                LeaveRateLimits,
            ))
            .build();

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            max_rate_limit_waits: config.max_rate_limit_waits,
        })
    }

    /// Resolves an API path such as `repos/o/r/issues` against the base url
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.api_url.join(path.trim_start_matches('/'))?)
    }

    /// Fetches a single JSON object
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        let response = self.send(url.as_str()).await?;
        decode(url.as_str(), response).await
    }

    /// Fetches one page of a listing and the url of the page after it
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, FetchError> {
        let response = self.send(url).await?;
        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);
        let items = decode(url, response).await?;
        Ok(Page { items, next })
    }

    /// Walks every page of a listing, starting at page 1
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FetchError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .extend_pairs(query)
            .append_pair("page", "1");

        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0;

        while let Some(current) = next {
            let page = self.get_page::<T>(&current).await?;
            pages += 1;
            debug!(url = %current, items = page.items.len(), "fetched page");
            items.extend(page.items);

            // A next link pointing back at the same page would loop forever
            next = page.next.filter(|n| *n != current);
        }

        debug!(pages, total = items.len(), "listing complete");
        Ok(items)
    }

    // Sends a GET, waiting out rate limits up to the configured budget
    async fn send(&self, url: &str) -> Result<Response, FetchError> {
        let mut waits = 0;
        loop {
            debug!(%url, "GET");
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if let Some(wait) = rate_limit_wait(status, response.headers(), Utc::now().timestamp())
            {
                if waits >= self.max_rate_limit_waits {
                    return Err(FetchError::RateLimited {
                        url: url.to_string(),
                        waits,
                    });
                }
                waits += 1;
                warn!(%url, wait_secs = wait.as_secs(), attempt = waits, "rate limited, waiting");
                tokio::time::sleep(wait).await;
                continue;
            }

            return Err(status_error(url, response).await);
        }
    }
}

/// Transient-error strategy that hands 403/429 back to `send()` untouched,
/// so rate limits are only retried after the wait GitHub asks for.
struct LeaveRateLimits;

impl RetryableStrategy for LeaveRateLimits {
    fn handle(
        &self,
        res: &Result<Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response)
                if matches!(
                    response.status(),
                    StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                ) =>
            {
                None
            }
            Ok(response) => default_on_request_success(response),
            Err(error) => default_on_request_failure(error),
        }
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, FetchError> {
    response.json::<T>().await.map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

async fn status_error(url: &str, response: Response) -> FetchError {
    let url = url.to_string();
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound { url },
        StatusCode::UNAUTHORIZED => FetchError::Unauthorized { url },
        _ => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            FetchError::Status {
                url,
                status,
                message,
            }
        }
    }
}

/// How long to wait before retrying a rate-limited response, or `None` if
/// the response is not a rate limit.
///
/// `now` is the current unix time in seconds.
pub fn rate_limit_wait(status: StatusCode, headers: &HeaderMap, now: i64) -> Option<Duration> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    // Retry-After is either delta-seconds or an HTTP-date
    if let Some(value) = header_str("retry-after").map(str::trim) {
        if let Ok(secs) = value.parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }
        if let Ok(date) = DateTime::parse_from_rfc2822(value) {
            return Some(Duration::from_secs((date.timestamp() - now).max(0) as u64));
        }
    }

    if header_str("x-ratelimit-remaining").map(str::trim) != Some("0") {
        return None;
    }

    match header_str("x-ratelimit-reset").and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(reset) => Some(Duration::from_secs((reset - now).max(0) as u64)),
        None => Some(DEFAULT_RATE_LIMIT_WAIT),
    }
}

/// Extracts the `rel="next"` url from a `Link` header
///
/// Example:
///   `<https://api.github.com/x?page=2>; rel="next", <...>; rel="last"`
///   -> `https://api.github.com/x?page=2`
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        segments
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| target.to_string())
    })
}
