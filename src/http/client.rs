//! Press reference HTTP client
//!
//! Issues exactly one GET per page:
//! `{base_url}/entities/organizations/{entity_id}/cards/press_references?order=posted_on%20desc[&after_id=...]`
//!
//! The API key travels in a request header, never in the URL, so the URL
//! can be logged freely.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::decode::decode_page;
use crate::error::{Error, Result};
use crate::types::Page;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.crunchbase.com/api/v4";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-cb-user-key";

/// Fixed ordering: newest first
const ORDER_QUERY: &str = "order=posted_on%20desc";

/// Source of press reference pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page that follows `cursor` (or the newest page when `None`)
    async fn fetch(&self, entity_id: &str, cursor: Option<&str>) -> Result<Page>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch(&self, entity_id: &str, cursor: Option<&str>) -> Result<Page> {
        (**self).fetch(entity_id, cursor).await
    }
}

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// API root, e.g. `https://api.crunchbase.com/api/v4`
    pub base_url: String,
    /// API key sent in [`API_KEY_HEADER`]
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
            rate_limit: None,
            user_agent: format!("cbnews/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("rate_limit", &self.rate_limit)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Client for the press references card.
///
/// Performs a single round trip per [`fetch`](PageFetcher::fetch); wrap it in
/// a [`RetryingFetcher`](super::RetryingFetcher) for retries.
pub struct PressReferenceClient {
    client: Client,
    config: HttpClientConfig,
    base_url: Url,
    rate_limiter: Option<RateLimiter>,
}

impl PressReferenceClient {
    /// Create a client with the given configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "base_url",
                format!("'{}' cannot be used as a base URL", config.base_url),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            base_url,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Build the URL of the page following `cursor`
    pub fn page_url(&self, entity_id: &str, cursor: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "entities",
                "organizations",
                entity_id,
                "cards",
                "press_references",
            ]);
        }
        url.set_query(Some(ORDER_QUERY));
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("after_id", cursor);
        }
        url
    }
}

#[async_trait]
impl PageFetcher for PressReferenceClient {
    async fn fetch(&self, entity_id: &str, cursor: Option<&str>) -> Result<Page> {
        let url = self.page_url(entity_id, cursor);

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!(
                "Press references request for '{entity_id}' failed with {}",
                status.as_u16()
            );
            return Err(Error::http_status(status.as_u16(), error_message(&body)));
        }

        let page = decode_page(&body)?;
        debug!("Fetched {} press references for '{entity_id}'", page.len());
        Ok(page)
    }
}

impl PressReferenceClient {
    fn classify(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else if error.is_builder() {
            // never sent; retrying would build the same request again
            Error::config(format!("Invalid request: {error}"))
        } else {
            Error::Http(error)
        }
    }
}

impl std::fmt::Debug for PressReferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressReferenceClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Render an error body for diagnostics, compacting it when it is JSON
fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
