//! Pagination types
//!
//! State machine states and per-run counters.

use std::fmt;

/// Where a paginator is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationState {
    /// More records may follow; the next pull may hit the network
    #[default]
    Fetching,
    /// The API returned an empty page
    Exhausted,
    /// A record older than the date bound was reached
    Bounded,
    /// A fetch failed; the error was returned to the caller
    Failed,
}

impl PaginationState {
    /// Check if the run is over
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fetching)
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Exhausted => "exhausted",
            Self::Bounded => "bounded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counters for one paginator run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationStats {
    /// Pages fetched successfully
    pub pages_fetched: u64,
    /// Records handed to the caller
    pub records_emitted: u64,
    /// Cursor the next fetch would use
    pub last_cursor: Option<String>,
}

impl PaginationStats {
    /// Record a fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record an emitted reference and advance the cursor
    pub fn add_record(&mut self, identifier: &str) {
        self.records_emitted += 1;
        self.last_cursor = Some(identifier.to_string());
    }
}
