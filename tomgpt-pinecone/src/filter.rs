//! Translation of [`MetadataFilter`] into Pinecone's `$eq`/`$in` filter
//! language.

use serde_json::{Map, Value};
use tomgpt_core::MetadataFilter;

use crate::error::PineconeStoreError;

pub fn filter_to_json(filter: &MetadataFilter) -> Result<Value, PineconeStoreError> {
    match filter {
        MetadataFilter::Eq(key, value) => Ok(field(key, "$eq", value.clone())),
        // Pinecone rejects an empty $in list.
        MetadataFilter::In(key, values) if values.is_empty() => Err(PineconeStoreError::Config(
            format!("$in filter on '{key}' needs at least one value"),
        )),
        MetadataFilter::In(key, values) => Ok(field(key, "$in", Value::Array(values.clone()))),
    }
}

fn field(key: &str, operator: &str, operand: Value) -> Value {
    let mut condition = Map::new();
    condition.insert(operator.to_string(), operand);
    let mut object = Map::new();
    object.insert(key.to_string(), Value::Object(condition));
    Value::Object(object)
}
