//! Common types used throughout cbnews
//!
//! This module contains the press reference record, the page it arrives
//! in, and the date bound used to filter records.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;

// ============================================================================
// Type Aliases
// ============================================================================

/// Opaque pagination token: the identifier of the last record consumed.
/// `None` means "start from the most recent record".
pub type Cursor = Option<String>;

/// Column names of an exported row, in output order
pub const COLUMNS: [&str; 6] = [
    "organization",
    "author",
    "identifier",
    "abstract",
    "url",
    "posted_on",
];

// ============================================================================
// Press Reference
// ============================================================================

/// One press reference (news article) attached to an organization.
///
/// Built once at decode time from a validated raw entry; holds no
/// mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Name of the organization owning the card
    #[serde(rename = "organization")]
    pub organization_name: String,
    /// Article author, when the API knows it
    pub author: Option<String>,
    /// API-assigned uuid; doubles as the next pagination cursor
    pub identifier: String,
    /// Human-readable title of the article
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Article URL
    pub url: String,
    /// Publication date
    pub posted_on: NaiveDate,
}

// ============================================================================
// Page
// ============================================================================

/// One API response: the organization name plus its press references in
/// the order the API returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    organization_name: String,
    references: Vec<Reference>,
}

impl Page {
    /// Create a page from already validated references
    pub fn new(organization_name: impl Into<String>, references: Vec<Reference>) -> Self {
        Self {
            organization_name: organization_name.into(),
            references,
        }
    }

    /// Organization the references belong to
    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    /// Number of references on this page
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// A page without references marks the end of the data
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Iterate over the references in API order
    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.references.iter()
    }
}

impl IntoIterator for Page {
    type Item = Reference;
    type IntoIter = std::vec::IntoIter<Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.into_iter()
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}

// ============================================================================
// Date Bound
// ============================================================================

/// Inclusive lower bound on `posted_on`.
///
/// The default is the Unix epoch, which admits every record the API
/// can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateBound(NaiveDate);

impl DateBound {
    /// Date format accepted on the command line and in config files
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Create a bound from a date
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|e| {
                Error::invalid_value(
                    "since",
                    format!("'{value}' is not in the format of YYYY-MM-DD: {e}"),
                )
            })
    }

    /// The bound date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// True when a record posted on `date` is within the bound
    pub fn admits(&self, date: NaiveDate) -> bool {
        date >= self.0
    }
}

impl Default for DateBound {
    fn default() -> Self {
        Self(NaiveDate::default())
    }
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
