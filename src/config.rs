//! Configuration for an export run
//!
//! Settings are layered, lowest precedence first:
//! built-in defaults, an optional JSON config file, command-line flags.
//! The API key is only ever read from the environment.

use crate::engine::{ExportOptions, DEFAULT_BATCH_SIZE};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy, DEFAULT_BASE_URL};
use crate::output::OutputFormat;
use crate::types::{DateBound, OptionStringExt};
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "CRUNCHBASE_API_KEY";

// ============================================================================
// Config File
// ============================================================================

/// Contents of the optional JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// API root
    #[serde(default)]
    pub base_url: Option<String>,

    /// Inclusive lower date bound (`YYYY-MM-DD`)
    #[serde(default)]
    pub since: Option<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Parse config JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("Invalid config JSON: {e}")))
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Total attempts per page, first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Client-side request limit
    #[serde(default)]
    pub rate_limit_per_minute: Option<u32>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            rate_limit_per_minute: None,
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_backoff_ms() -> u64 {
    RetryPolicy::default().backoff.as_millis() as u64
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Records per written batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

// ============================================================================
// Overrides
// ============================================================================

/// Values given on the command line; `None` keeps the lower layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub after_id: Option<String>,
    pub since: Option<String>,
    pub base_url: Option<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub max_attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub rate_limit: Option<u32>,
    pub max_records: Option<usize>,
    pub batch_size: Option<usize>,
}

// ============================================================================
// Resolved Config
// ============================================================================

/// Fully resolved, validated configuration for one export
#[derive(Clone)]
pub struct ExportConfig {
    /// Organization permalink or uuid
    pub entity_id: String,
    /// API key
    pub api_key: String,
    /// Resume after this record (`None` = newest)
    pub start_cursor: Option<String>,
    /// Inclusive lower bound on `posted_on`
    pub date_bound: DateBound,
    /// API root
    pub base_url: String,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
    /// Per-request timeout
    pub timeout: Duration,
    /// Client-side request limit
    pub rate_limit_per_minute: Option<u32>,
    /// Output format
    pub format: OutputFormat,
    /// Output path (`None` = stdout)
    pub output: Option<PathBuf>,
    /// Records per written batch
    pub batch_size: usize,
    /// Stop after this many records
    pub max_records: Option<usize>,
}

impl ExportConfig {
    /// Resolve and validate a configuration.
    ///
    /// Fails with a configuration error before any network activity.
    pub fn resolve(
        entity_id: &str,
        api_key: Option<String>,
        file: FileConfig,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let entity_id = entity_id.trim();
        if entity_id.is_empty() {
            return Err(Error::missing_field("entity_id"));
        }

        let api_key = api_key
            .none_if_empty()
            .ok_or_else(|| Error::missing_field(API_KEY_ENV))?;
        if HeaderValue::from_str(&api_key).is_err() {
            return Err(Error::invalid_value(
                API_KEY_ENV,
                "contains characters not allowed in an HTTP header",
            ));
        }

        let date_bound = match overrides.since.or(file.since).none_if_empty() {
            Some(since) => DateBound::parse(&since)?,
            None => DateBound::default(),
        };

        let base_url = overrides
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| Error::invalid_value("base_url", format!("'{base_url}': {e}")))?;

        let max_attempts = overrides.max_attempts.unwrap_or(file.http.max_attempts);
        if max_attempts == 0 {
            return Err(Error::invalid_value("max_attempts", "must be at least 1"));
        }
        let backoff_ms = overrides.backoff_ms.unwrap_or(file.http.backoff_ms);

        let timeout_secs = overrides.timeout_secs.unwrap_or(file.http.timeout_seconds);
        if timeout_secs == 0 {
            return Err(Error::invalid_value("timeout", "must be at least 1 second"));
        }

        let rate_limit_per_minute = overrides.rate_limit.or(file.http.rate_limit_per_minute);
        if rate_limit_per_minute == Some(0) {
            return Err(Error::invalid_value("rate_limit", "must be at least 1"));
        }

        let batch_size = overrides.batch_size.unwrap_or(file.output.batch_size);
        if batch_size == 0 {
            return Err(Error::invalid_value("batch_size", "must be at least 1"));
        }

        let format = overrides.format.unwrap_or(file.output.format);
        if format == OutputFormat::Parquet && overrides.output.is_none() {
            return Err(Error::invalid_value(
                "output",
                "parquet output needs a file path (use -o)",
            ));
        }

        Ok(Self {
            entity_id: entity_id.to_string(),
            api_key,
            start_cursor: overrides.after_id.none_if_empty(),
            date_bound,
            base_url,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
            timeout: Duration::from_secs(timeout_secs),
            rate_limit_per_minute,
            format,
            output: overrides.output,
            batch_size,
            max_records: overrides.max_records,
        })
    }

    /// HTTP client settings for this run
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .api_key(&self.api_key)
            .timeout(self.timeout);

        let builder = match self.rate_limit_per_minute {
            Some(rpm) => builder.rate_limit(RateLimiterConfig::per_minute(rpm)),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }

    /// Export engine options for this run
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            batch_size: self.batch_size,
            max_records: self.max_records,
        }
    }
}

impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("entity_id", &self.entity_id)
            .field("api_key", &"<redacted>")
            .field("start_cursor", &self.start_cursor)
            .field("date_bound", &self.date_bound)
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("format", &self.format)
            .field("output", &self.output)
            .field("batch_size", &self.batch_size)
            .field("max_records", &self.max_records)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key() -> Option<String> {
        Some("secret".to_string())
    }

    #[test]
    fn test_resolve_defaults() {
        let config =
            ExportConfig::resolve("acme", key(), FileConfig::default(), ConfigOverrides::default())
                .unwrap();

        assert_eq!(config.entity_id, "acme");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.date_bound, DateBound::default());
        assert!(config.start_cursor.is_none());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.rate_limit_per_minute.is_none());
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_missing_api_key() {
        for api_key in [None, Some(String::new())] {
            let err = ExportConfig::resolve(
                "acme",
                api_key,
                FileConfig::default(),
                ConfigOverrides::default(),
            )
            .unwrap_err();
            assert!(err.is_config());
            assert!(err.to_string().contains(API_KEY_ENV));
        }
    }

    #[test]
    fn test_api_key_must_fit_in_a_header() {
        for api_key in ["secret\n", "sec\rret", "line\nbreak"] {
            let err = ExportConfig::resolve(
                "acme",
                Some(api_key.to_string()),
                FileConfig::default(),
                ConfigOverrides::default(),
            )
            .unwrap_err();
            assert!(err.is_config());
            assert!(!err.is_retryable());
            assert!(err.to_string().contains(API_KEY_ENV));
            assert!(!err.to_string().contains("secret"));
        }
    }

    #[test]
    fn test_empty_entity_id() {
        let err =
            ExportConfig::resolve("  ", key(), FileConfig::default(), ConfigOverrides::default())
                .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_since() {
        let overrides = ConfigOverrides {
            since: Some("31/12/2019".into()),
            ..Default::default()
        };
        let err = ExportConfig::resolve("acme", key(), FileConfig::default(), overrides)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_numbers() {
        let cases = [
            ConfigOverrides {
                max_attempts: Some(0),
                ..Default::default()
            },
            ConfigOverrides {
                rate_limit: Some(0),
                ..Default::default()
            },
            ConfigOverrides {
                batch_size: Some(0),
                ..Default::default()
            },
            ConfigOverrides {
                timeout_secs: Some(0),
                ..Default::default()
            },
            ConfigOverrides {
                base_url: Some("::not a url".into()),
                ..Default::default()
            },
        ];

        for overrides in cases {
            let err = ExportConfig::resolve("acme", key(), FileConfig::default(), overrides)
                .unwrap_err();
            assert!(err.is_config(), "{err}");
        }
    }

    #[test]
    fn test_parquet_needs_output_path() {
        let overrides = ConfigOverrides {
            format: Some(OutputFormat::Parquet),
            ..Default::default()
        };
        let err = ExportConfig::resolve("acme", key(), FileConfig::default(), overrides)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_file_config_parsing() {
        let file = FileConfig::from_json(
            r#"{
                "base_url": "http://localhost:9000/v4",
                "since": "2020-01-01",
                "http": { "max_attempts": 5, "rate_limit_per_minute": 200 },
                "output": { "format": "json" }
            }"#,
        )
        .unwrap();

        assert_eq!(file.http.max_attempts, 5);
        assert_eq!(file.http.backoff_ms, 2000);
        assert_eq!(file.http.timeout_seconds, 10);
        assert_eq!(file.output.format, OutputFormat::Json);
        assert_eq!(file.output.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        let err = FileConfig::from_json(r#"{"api_key": "oops"}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = FileConfig::from_json(
            r#"{
                "base_url": "http://file.example/v4",
                "since": "2018-01-01",
                "http": { "max_attempts": 5, "backoff_ms": 10 }
            }"#,
        )
        .unwrap();
        let overrides = ConfigOverrides {
            since: Some("2020-01-01".into()),
            max_attempts: Some(2),
            after_id: Some("uuid-7".into()),
            ..Default::default()
        };

        let config = ExportConfig::resolve("acme", key(), file, overrides).unwrap();

        assert_eq!(config.base_url, "http://file.example/v4");
        assert_eq!(
            config.date_bound.date(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(
            config.retry,
            RetryPolicy::new(2, Duration::from_millis(10))
        );
        assert_eq!(config.start_cursor.as_deref(), Some("uuid-7"));
    }

    #[test]
    fn test_derived_settings() {
        let overrides = ConfigOverrides {
            rate_limit: Some(120),
            max_records: Some(50),
            batch_size: Some(25),
            ..Default::default()
        };
        let config =
            ExportConfig::resolve("acme", key(), FileConfig::default(), overrides).unwrap();

        let http = config.http_client_config();
        assert_eq!(http.api_key, "secret");
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::per_minute(120)));

        let options = config.export_options();
        assert_eq!(options.batch_size, 25);
        assert_eq!(options.max_records, Some(50));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            ExportConfig::resolve("acme", key(), FileConfig::default(), ConfigOverrides::default())
                .unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
