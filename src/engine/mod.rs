//! Export engine module
//!
//! Drains a reference stream into a [`BatchSink`].
//!
//! # Overview
//!
//! Records are buffered and written in batches of `batch_size`. Output is
//! append-only: when the stream fails, whatever is buffered is written and
//! the sink is finished before the error is returned, so rows already
//! exported are kept. Nothing is resumed automatically.

mod types;

pub use types::{ExportOptions, ExportStats, DEFAULT_BATCH_SIZE};

use crate::error::Result;
use crate::output::{references_to_batch, BatchSink};
use crate::types::Reference;
use futures::{pin_mut, Stream, StreamExt};
use std::time::Instant;
use tracing::{debug, warn};

/// Export every reference from `references` into `sink`.
///
/// Consumes the sink; it is always finished, also on error.
pub async fn export<S>(
    references: S,
    sink: Box<dyn BatchSink>,
    options: &ExportOptions,
) -> Result<ExportStats>
where
    S: Stream<Item = Result<Reference>>,
{
    let start = Instant::now();
    let mut exporter = Exporter {
        sink,
        buffer: Vec::with_capacity(options.batch_size.max(1)),
        batch_size: options.batch_size.max(1),
        stats: ExportStats::default(),
    };

    pin_mut!(references);

    let mut failure = None;
    loop {
        if options
            .max_records
            .is_some_and(|max| exporter.pending() >= max)
        {
            debug!("Reached record limit, stopping");
            exporter.stats.limit_reached = true;
            break;
        }

        let Some(item) = references.next().await else {
            break;
        };

        if let Err(e) = item.and_then(|reference| exporter.push(reference)) {
            failure = Some(e);
            break;
        }
    }

    let records = exporter.pending();
    let stats = exporter.close(failure.is_some());
    if let Some(e) = failure {
        warn!("Export failed after {records} records: {e}");
        return Err(e);
    }

    let mut stats = stats?;
    stats.set_duration(start.elapsed().as_millis() as u64);
    Ok(stats)
}

struct Exporter {
    sink: Box<dyn BatchSink>,
    buffer: Vec<Reference>,
    batch_size: usize,
    stats: ExportStats,
}

impl Exporter {
    /// Records accepted so far, written or buffered
    fn pending(&self) -> usize {
        self.stats.records_written + self.buffer.len()
    }

    fn push(&mut self, reference: Reference) -> Result<()> {
        self.buffer.push(reference);
        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = references_to_batch(&self.buffer)?;
        self.sink.write(&batch)?;
        self.stats.add_batch(batch.num_rows());
        debug!(
            "Wrote batch of {} records ({} total)",
            batch.num_rows(),
            self.stats.records_written
        );
        self.buffer.clear();
        Ok(())
    }

    /// Flush what is buffered and finish the sink. When the export already
    /// failed, output errors here are logged and the original error wins.
    fn close(mut self, failed: bool) -> Result<ExportStats> {
        let flushed = self.flush();
        let finished = self.sink.finish();

        if failed {
            if let Err(e) = flushed.and(finished.map(|_| ())) {
                warn!("Failed to finalize partial output: {e}");
            }
            return Ok(self.stats);
        }

        flushed?;
        finished?;
        Ok(self.stats)
    }
}
