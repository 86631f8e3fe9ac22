// GitHub API HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::config::RequestConfig;
use crate::error::{ChangelogError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a client from validated request settings.
    ///
    /// The token is sent verbatim, so it may carry its own scheme prefix.
    pub fn new(config: &RequestConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&config.token)
                .map_err(|e| ChangelogError::Other(format!("invalid github-token: {e}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ChangelogError::Other(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ChangelogError::Api)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            rate_limit: RateLimit::default(),
        })
    }

    /// API root every endpoint is relative to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Make a GET request to an endpoint relative to the API base.
    pub async fn get(&mut self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.get_url(&url).await
    }

    /// Make a GET request to an absolute URL, such as a release pointer.
    pub async fn get_url(&mut self, url: &str) -> Result<Response> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(ChangelogError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            self.rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            self.rate_limit.remaining = Some(remaining);
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            self.rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ChangelogError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(ChangelogError::NotFound(url))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if self.rate_limit.is_exhausted() =>
            {
                Err(ChangelogError::RateLimited {
                    reset_at: self.rate_limit.reset_display(),
                })
            }
            status => Err(ChangelogError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_config(base_url: &str) -> RequestConfig {
        RequestConfig {
            token: "token t".to_string(),
            base_url: base_url.to_string(),
            user_agent: "changelog-test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sends_configured_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("Authorization", "token t"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("User-Agent", "changelog-test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = GitHubClient::new(&request_config(&mock_server.uri())).unwrap();
        assert!(client.get("/ping").await.is_ok());
    }

    #[tokio::test]
    async fn test_maps_error_statuses() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/unauthorized"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let mut client = GitHubClient::new(&request_config(&mock_server.uri())).unwrap();

        assert!(matches!(
            client.get("/unauthorized").await,
            Err(ChangelogError::Unauthorized)
        ));
        assert!(matches!(
            client.get("/missing").await,
            Err(ChangelogError::NotFound(url)) if url.ends_with("/missing")
        ));
        assert!(matches!(
            client.get("/broken").await,
            Err(ChangelogError::Http { status: 500, body }) if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/limited"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "0"),
            )
            .mount(&mock_server)
            .await;

        let mut client = GitHubClient::new(&request_config(&mock_server.uri())).unwrap();

        assert!(matches!(
            client.get("/limited").await,
            Err(ChangelogError::RateLimited { .. })
        ));
        assert_eq!(client.rate_limit().limit, 60);
        assert_eq!(client.rate_limit().remaining, Some(0));
    }

    #[tokio::test]
    async fn test_forbidden_without_exhausted_quota() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/forbidden"))
            .respond_with(ResponseTemplate::new(403).set_body_string("nope"))
            .mount(&mock_server)
            .await;

        let mut client = GitHubClient::new(&request_config(&mock_server.uri())).unwrap();

        assert!(matches!(
            client.get("/forbidden").await,
            Err(ChangelogError::Http { status: 403, .. })
        ));
    }

    #[test]
    fn test_rejects_unprintable_token() {
        let mut config = request_config("http://localhost");
        config.token = "bad\ntoken".to_string();
        assert!(GitHubClient::new(&config).is_err());
    }
}
