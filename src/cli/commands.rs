//! CLI arguments

use crate::config::ConfigOverrides;
use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Export an organization's press references from the Crunchbase API.
///
/// The API key is read from the CRUNCHBASE_API_KEY environment variable.
#[derive(Parser, Debug)]
#[command(name = "cbnews")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Organization permalink or uuid (e.g. "siemens")
    pub entity: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Resume after this press reference uuid
    #[arg(long)]
    pub after_id: Option<String>,

    /// Only export references posted on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// API root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Total attempts per page, first one included
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum requests per minute
    #[arg(long)]
    pub rate_limit: Option<u32>,

    /// Stop after this many references
    #[arg(long)]
    pub max_records: Option<usize>,

    /// References per written batch
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl Cli {
    /// Log filter from `RUST_LOG`, falling back to INFO (DEBUG with `-v`)
    pub fn log_filter(&self) -> EnvFilter {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
        self.log_filter_from(&directives)
    }

    fn log_filter_from(&self, directives: &str) -> EnvFilter {
        let level = if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };
        EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(directives)
    }

    /// Flags that override the config file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            after_id: self.after_id.clone(),
            since: self.since.clone(),
            base_url: self.base_url.clone(),
            format: self.format,
            output: self.output.clone(),
            max_attempts: self.max_attempts,
            backoff_ms: self.backoff_ms,
            timeout_secs: self.timeout_secs,
            rate_limit: self.rate_limit,
            max_records: self.max_records,
            batch_size: self.batch_size,
        }
    }
}
