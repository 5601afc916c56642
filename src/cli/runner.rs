//! CLI runner - executes an export

use crate::cli::commands::Cli;
use crate::config::{ExportConfig, FileConfig, API_KEY_ENV};
use crate::engine::{self, ExportStats};
use crate::error::Result;
use crate::http::{PressReferenceClient, RetryingFetcher};
use crate::output::open_sink;
use crate::pagination::ReferencePaginator;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    api_key: Option<String>,
}

impl Runner {
    /// Create a runner, reading the API key from the environment
    pub fn new(cli: Cli) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        Self::with_api_key(cli, api_key)
    }

    /// Create a runner with an explicit API key
    pub fn with_api_key(cli: Cli, api_key: Option<String>) -> Self {
        Self { cli, api_key }
    }

    /// Resolve the configuration for this run
    pub fn resolve_config(&self) -> Result<ExportConfig> {
        let file = match &self.cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        ExportConfig::resolve(
            &self.cli.entity,
            self.api_key.clone(),
            file,
            self.cli.overrides(),
        )
    }

    /// Run the export
    pub async fn run(&self) -> Result<ExportStats> {
        let config = self.resolve_config()?;
        let start = Instant::now();

        let client = PressReferenceClient::with_config(config.http_client_config())?;
        let fetcher = RetryingFetcher::new(client, config.retry);
        let mut paginator = ReferencePaginator::new(
            fetcher,
            config.entity_id.clone(),
            config.start_cursor.clone(),
            config.date_bound,
        );
        let sink = open_sink(config.format, config.output.as_deref())?;

        info!(
            "Exporting press references for '{}' since {}",
            config.entity_id, config.date_bound
        );

        let stats = engine::export(
            paginator.references(),
            sink,
            &config.export_options(),
        )
        .await?;

        let pagination = paginator.stats();
        info!(
            "Completed export for '{}': {} records in {} pages ({}) in {:?}",
            config.entity_id,
            stats.records_written,
            pagination.pages_fetched,
            paginator.state(),
            start.elapsed()
        );
        if let Some(cursor) = &pagination.last_cursor {
            info!("Last exported reference: {cursor}");
        }

        Ok(stats)
    }
}
