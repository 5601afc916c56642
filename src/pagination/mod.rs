//! Pagination module
//!
//! Drives the press references cursor until the data runs out or a record
//! falls before the date bound.
//!
//! # Overview
//!
//! Pages arrive newest first (`order=posted_on desc`). The paginator scans
//! each page in API order; the cursor for the next request is the
//! identifier of the last record it handed out. Two terminal states end a
//! run:
//!
//! - `Exhausted`: the API returned a page with no references
//! - `Bounded`: a record was posted strictly before the bound
//!
//! `Bounded` ends the whole run, not just the current page. That is only
//! sound while the API keeps its descending order; if the ordering
//! guarantee ever goes away, the scan must become exhaustive.

mod paginator;
mod types;

pub use paginator::ReferencePaginator;
pub use types::{PaginationState, PaginationStats};

#[cfg(test)]
mod tests;
