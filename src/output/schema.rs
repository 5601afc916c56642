//! Arrow schema for exported references

use crate::error::Result;
use crate::types::{Reference, COLUMNS};
use arrow::array::{ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Schema of an exported row. Only `author` is nullable.
pub fn reference_schema() -> SchemaRef {
    let [organization, author, identifier, summary, url, posted_on] = COLUMNS;
    Arc::new(Schema::new(vec![
        Field::new(organization, DataType::Utf8, false),
        Field::new(author, DataType::Utf8, true),
        Field::new(identifier, DataType::Utf8, false),
        Field::new(summary, DataType::Utf8, false),
        Field::new(url, DataType::Utf8, false),
        Field::new(posted_on, DataType::Date32, false),
    ]))
}

/// Convert references to a RecordBatch in [`reference_schema`] layout
pub fn references_to_batch(references: &[Reference]) -> Result<RecordBatch> {
    let strings = |f: fn(&Reference) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(references.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        strings(|r| r.organization_name.as_str()),
        Arc::new(StringArray::from_iter(
            references.iter().map(|r| r.author.as_deref()),
        )),
        strings(|r| r.identifier.as_str()),
        strings(|r| r.summary.as_str()),
        strings(|r| r.url.as_str()),
        Arc::new(Date32Array::from_iter_values(
            references
                .iter()
                .map(|r| Date32Type::from_naive_date(r.posted_on)),
        )),
    ];

    Ok(RecordBatch::try_new(reference_schema(), columns)?)
}
