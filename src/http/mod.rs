//! HTTP module
//!
//! Fetches press reference pages from the API.
//!
//! # Features
//!
//! - **PageFetcher**: the seam the paginator pulls pages through
//! - **PressReferenceClient**: one GET per page, status check, body decoding
//! - **Retries**: fixed-interval retry of transient failures via `RetryPolicy`
//! - **Rate Limiting**: optional token bucket limiter using governor

mod client;
mod rate_limit;
mod retry;

pub use client::{
    HttpClientConfig, HttpClientConfigBuilder, PageFetcher, PressReferenceClient, API_KEY_HEADER,
    DEFAULT_BASE_URL,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{RetryPolicy, RetryingFetcher};
