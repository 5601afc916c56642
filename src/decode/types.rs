//! Wire types for the press references card
//!
//! Every field is optional here; presence is checked in
//! [`decode_page`](super::decode_page) so errors can name what is missing.

use serde::Deserialize;

/// Top-level response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    /// Properties of the organization entity
    pub properties: Option<RawProperties>,
    /// Requested cards
    pub cards: Option<RawCards>,
}

/// Organization properties
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    /// Organization identifier; `value` is its display name
    pub identifier: Option<RawEntityId>,
}

/// Identifier object used by the API for every entity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntityId {
    pub uuid: Option<String>,
    pub value: Option<String>,
}

/// Cards section of the response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCards {
    pub press_references: Option<Vec<RawPressReference>>,
}

/// One raw press reference entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPressReference {
    pub identifier: Option<RawEntityId>,
    pub author: Option<String>,
    pub url: Option<RawUrl>,
    pub posted_on: Option<String>,
}

/// Link object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrl {
    pub value: Option<String>,
}
