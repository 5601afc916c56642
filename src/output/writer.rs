//! Output sinks
//!
//! Every sink takes RecordBatches in [`reference_schema`] layout. CSV and
//! JSON rows are complete as soon as they reach the underlying writer, so
//! rows already written survive a failed run once the sink is finished or
//! dropped. Parquet is only readable once `finish` writes the footer.

use super::schema::reference_schema;
use crate::error::{Error, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with a header row
    #[default]
    Csv,
    /// JSON output (one record per line)
    Json,
    /// Parquet file
    Parquet,
}

/// Destination for record batches
pub trait BatchSink: Send {
    /// Append a batch
    fn write(&mut self, batch: &RecordBatch) -> Result<()>;

    /// Flush and close the sink, returning the number of rows written
    fn finish(self: Box<Self>) -> Result<usize>;
}

/// Open a sink for `format`, writing to `path` or stdout
pub fn open_sink(format: OutputFormat, path: Option<&Path>) -> Result<Box<dyn BatchSink>> {
    let writer: Box<dyn Write + Send> = match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::output(format!("Failed to create {}: {e}", path.display()))
            })?;
            Box::new(BufWriter::new(file))
        }
        None if format == OutputFormat::Parquet => {
            return Err(Error::invalid_value(
                "output",
                "parquet output needs a file path (use -o)",
            ));
        }
        None => Box::new(io::stdout()),
    };

    Ok(match format {
        OutputFormat::Csv => Box::new(CsvSink::new(writer)),
        OutputFormat::Json => Box::new(JsonLinesSink::new(writer)),
        OutputFormat::Parquet => Box::new(ParquetSink::new(writer)?),
    })
}

// ============================================================================
// CSV
// ============================================================================

/// CSV sink; the header is written even when no rows follow
pub struct CsvSink<W: Write> {
    writer: arrow::csv::Writer<W>,
    rows_written: usize,
    started: bool,
}

impl<W: Write> CsvSink<W> {
    /// Create a CSV sink over `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer: arrow::csv::WriterBuilder::new()
                .with_header(true)
                .build(writer),
            rows_written: 0,
            started: false,
        }
    }
}

impl<W: Write + Send> BatchSink for CsvSink<W> {
    fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        self.started = true;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<usize> {
        if !self.started {
            self.writer
                .write(&RecordBatch::new_empty(reference_schema()))?;
        }
        let rows = self.rows_written;
        self.writer.into_inner().flush()?;
        Ok(rows)
    }
}

// ============================================================================
// JSON Lines
// ============================================================================

/// Newline-delimited JSON sink; a missing author is written as `null`
pub struct JsonLinesSink<W: Write> {
    writer: arrow::json::Writer<W, arrow::json::writer::LineDelimited>,
    rows_written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a JSON lines sink over `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer: arrow::json::WriterBuilder::new()
                .with_explicit_nulls(true)
                .build(writer),
            rows_written: 0,
        }
    }
}

impl<W: Write + Send> BatchSink for JsonLinesSink<W> {
    fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<usize> {
        self.writer.finish()?;
        let rows = self.rows_written;
        self.writer.into_inner().flush()?;
        Ok(rows)
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// Parquet sink (Snappy compressed)
pub struct ParquetSink<W: Write + Send> {
    writer: ArrowWriter<W>,
    rows_written: usize,
}

impl<W: Write + Send> ParquetSink<W> {
    /// Create a Parquet sink over `writer`
    pub fn new(writer: W) -> Result<Self> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let writer = ArrowWriter::try_new(writer, reference_schema(), Some(props))?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }
}

impl<W: Write + Send> BatchSink for ParquetSink<W> {
    fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<usize> {
        let rows = self.rows_written;
        let mut inner = self.writer.into_inner()?;
        inner.flush()?;
        Ok(rows)
    }
}
