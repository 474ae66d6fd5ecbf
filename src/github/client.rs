// GitHub API HTTP client.
// Handles optional authentication, rate limiting, and status-to-error mapping.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FeedError, Result};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a new GitHub client. Without a token requests are anonymous,
    /// which is enough for public repository events.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| FeedError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("activity-feed"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FeedError::Api)?;

        Ok(Self {
            client,
            rate_limit: RateLimit::default(),
        })
    }

    /// Create a client using GITHUB_TOKEN when it is set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        Self::new(token.as_deref())
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", GITHUB_API_BASE, endpoint);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(FeedError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.set_rate_limit(
            header("x-ratelimit-limit").as_deref(),
            header("x-ratelimit-remaining").as_deref(),
            header("x-ratelimit-reset").as_deref(),
        );
    }

    /// Overwrite whichever rate limit fields parse.
    pub(super) fn set_rate_limit(
        &mut self,
        limit: Option<&str>,
        remaining: Option<&str>,
        reset: Option<&str>,
    ) {
        if let Some(limit) = limit.and_then(|v| v.parse().ok()) {
            self.rate_limit.limit = limit;
        }
        if let Some(remaining) = remaining.and_then(|v| v.parse().ok()) {
            self.rate_limit.remaining = remaining;
        }
        if let Some(reset) = reset.and_then(|v| v.parse().ok()) {
            self.rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        ) {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(self.status_error(status, &url, body))
    }

    /// Map a non-success status to an error. Shared with JSON-P responses,
    /// which report their status in the body.
    pub(super) fn status_error(&self, status: StatusCode, url: &str, body: String) -> FeedError {
        match status {
            StatusCode::UNAUTHORIZED => FeedError::Unauthorized,
            StatusCode::NOT_FOUND => FeedError::NotFound(url.to_string()),
            StatusCode::FORBIDDEN if self.rate_limit.remaining == 0 => {
                let reset_at = chrono::DateTime::from_timestamp(self.rate_limit.reset as i64, 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                FeedError::RateLimited { reset_at }
            }
            StatusCode::FORBIDDEN => FeedError::Other(format!("Forbidden: {}", body)),
            status => FeedError::Other(format!("HTTP {}: {}", status, body)),
        }
    }
}
