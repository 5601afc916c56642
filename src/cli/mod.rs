//! CLI module
//!
//! Command-line interface for exporting press references.
//!
//! ```text
//! CRUNCHBASE_API_KEY=... cbnews siemens --since 2020-01-01 -o siemens.csv
//! ```

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
