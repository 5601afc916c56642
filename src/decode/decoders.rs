//! Page decoder
//!
//! Validates a raw response and projects it into [`Reference`] records.

use super::types::{RawPressReference, RawResponse};
use crate::error::{Error, Result};
use crate::types::{OptionStringExt, Page, Reference};
use chrono::{DateTime, NaiveDate};

/// Decode a response body into a [`Page`].
///
/// Fails with [`Error::MalformedResponse`] when the body is not JSON or any
/// required field is absent.
pub fn decode_page(body: &str) -> Result<Page> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("Failed to parse JSON: {e}")))?;

    let organization_name = raw
        .properties
        .and_then(|p| p.identifier)
        .and_then(|id| id.value)
        .ok_or_else(|| Error::malformed("missing properties.identifier.value"))?;

    let entries = raw
        .cards
        .and_then(|c| c.press_references)
        .ok_or_else(|| Error::malformed("missing cards.press_references"))?;

    let references = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| project(&organization_name, index, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(organization_name, references))
}

fn project(organization_name: &str, index: usize, entry: RawPressReference) -> Result<Reference> {
    let missing = |field: &str| Error::malformed(format!("press_references[{index}]: missing {field}"));

    let identifier = entry.identifier.ok_or_else(|| missing("identifier"))?;
    let uuid = identifier.uuid.ok_or_else(|| missing("identifier.uuid"))?;
    let summary = identifier.value.ok_or_else(|| missing("identifier.value"))?;
    let url = entry
        .url
        .and_then(|u| u.value)
        .ok_or_else(|| missing("url.value"))?;
    let posted_on = entry.posted_on.ok_or_else(|| missing("posted_on"))?;
    let posted_on = parse_posted_on(&posted_on)
        .map_err(|e| Error::malformed(format!("press_references[{index}]: {e}")))?;

    Ok(Reference {
        organization_name: organization_name.to_string(),
        author: entry.author.none_if_empty(),
        identifier: uuid,
        summary,
        url,
        posted_on,
    })
}

/// Parse a `posted_on` value.
///
/// The API sends `YYYY-MM-DD`; full RFC 3339 timestamps are accepted too
/// and truncated to their date.
pub fn parse_posted_on(value: &str) -> std::result::Result<NaiveDate, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| format!("invalid posted_on '{value}'"))
}
