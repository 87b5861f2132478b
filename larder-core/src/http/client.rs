//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::FetchError;

use super::charset::decode_bytes_to_utf8;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; larder/0.1; recipe-to-markdown)";

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a page and decode it to a UTF-8 string.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for [`ReqwestClient`].
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Environment variables:
    /// - `LARDER_HTTP_TIMEOUT_SECS`: request timeout in seconds (default 30)
    /// - `LARDER_USER_AGENT`: user agent sent with every request
    pub fn new() -> Self {
        let timeout = std::env::var("LARDER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let user_agent = std::env::var("LARDER_USER_AGENT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Self {
            timeout,
            user_agent,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ReqwestClient, FetchError> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(ReqwestClient { inner })
    }
}

/// Production HTTP client: a plain GET with charset-aware decoding.
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with the default configuration.
    pub fn new() -> Result<Self, FetchError> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme {:?} in {}",
                parsed.scheme(),
                url
            )));
        }

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await?;
        tracing::debug!(url, status = %status, bytes = bytes.len(), "network: fetched");

        Ok(decode_bytes_to_utf8(&bytes, content_type.as_deref()))
    }
}

/// Mock response for testing.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Html(String),
    Status(u16),
}

/// Mock HTTP client for testing.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an HTML response for a URL.
    pub fn with_html(mut self, url: &str, html: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Html(html.to_string()));
        self
    }

    /// Make a URL answer with a non-success status.
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Status(status));
        self
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}
