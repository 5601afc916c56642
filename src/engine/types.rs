//! Engine types
//!
//! Options and statistics for an export run.

/// Default number of records per written batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Options for [`export`](super::export)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Records buffered before a batch is written
    pub batch_size: usize,
    /// Stop consuming after this many records
    pub max_records: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_records: None,
        }
    }
}

impl ExportOptions {
    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the record limit
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// Statistics from an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Rows handed to the sink
    pub records_written: usize,
    /// Batches handed to the sink
    pub batches_written: usize,
    /// Whether consumption stopped at `max_records`
    pub limit_reached: bool,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ExportStats {
    /// Record a written batch
    pub fn add_batch(&mut self, rows: usize) {
        self.batches_written += 1;
        self.records_written += rows;
    }

    /// Set the duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
