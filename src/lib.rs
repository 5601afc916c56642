// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # cbnews
//!
//! Export an organization's press references from the Crunchbase v4 API.
//!
//! References are fetched page by page, newest first, using the uuid of
//! the last consumed record as the `after_id` cursor. Paging stops when
//! the API returns an empty page or when a record older than the date
//! bound is seen.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cbnews::http::{HttpClientConfig, PressReferenceClient, RetryPolicy, RetryingFetcher};
//! use cbnews::pagination::ReferencePaginator;
//! use cbnews::DateBound;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> cbnews::Result<()> {
//!     let config = HttpClientConfig::builder().api_key("...").build();
//!     let client = PressReferenceClient::with_config(config)?;
//!     let fetcher = RetryingFetcher::new(client, RetryPolicy::default());
//!
//!     let bound = DateBound::parse("2020-01-01")?;
//!     let mut paginator = ReferencePaginator::new(fetcher, "siemens", None, bound);
//!     let mut references = paginator.references();
//!     while let Some(reference) = references.next().await {
//!         println!("{:?}", reference?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐   ┌───────────┐
//! │ HTTP client  │ → │ Retrying fetcher │ → │  Paginator   │ → │  Engine   │
//! │ + decode     │   │ (fixed backoff)  │   │ (after_id,   │   │ (batches  │
//! │ + rate limit │   │                  │   │  date bound) │   │  → sink)  │
//! └──────────────┘   └──────────────────┘   └──────────────┘   └───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Response decoding
pub mod decode;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination with a date bound
pub mod pagination;

/// CSV, JSON and Parquet output
pub mod output;

/// Export execution
pub mod engine;

/// Configuration layering
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
