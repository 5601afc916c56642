//! Response decoder module
//!
//! Turns a press reference response body into a typed [`Page`].
//!
//! # Overview
//!
//! The body is deserialized into loosely typed wire structs first, then
//! every entry is validated field by field. A missing field fails the whole
//! page with [`Error::MalformedResponse`] naming the entry and the field,
//! so nothing downstream ever sees a half-populated record.
//!
//! [`Page`]: crate::types::Page
//! [`Error::MalformedResponse`]: crate::error::Error::MalformedResponse

mod decoders;
mod types;

pub use decoders::{decode_page, parse_posted_on};
pub use types::{RawCards, RawEntityId, RawPressReference, RawProperties, RawResponse, RawUrl};
