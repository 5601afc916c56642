//! Output module
//!
//! Turns references into Arrow RecordBatches and writes them to a sink.
//!
//! # Overview
//!
//! Every row has the same six columns in a stable order:
//! `organization, author, identifier, abstract, url, posted_on`.
//!
//! Sinks:
//! - CSV with a header row
//! - newline-delimited JSON
//! - Parquet

mod schema;
mod writer;

pub use schema::{reference_schema, references_to_batch};
pub use writer::{open_sink, BatchSink, CsvSink, JsonLinesSink, OutputFormat, ParquetSink};
