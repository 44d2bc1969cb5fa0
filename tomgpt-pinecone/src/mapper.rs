use std::collections::HashMap;

use serde_json::Value;
use tomgpt_core::Document;

use crate::error::PineconeStoreError;

/// Rebuilds a document from a query match; the chunk text lives in metadata
/// under `text_key`, every other key is kept as document metadata.
pub fn match_to_document(
    id: &str,
    metadata: &Value,
    text_key: &str,
) -> Result<Document, PineconeStoreError> {
    let object = metadata.as_object().ok_or_else(|| {
        PineconeStoreError::Malformed("match metadata must be an object".to_string())
    })?;
    let text = object
        .get(text_key)
        .and_then(Value::as_str)
        .ok_or_else(|| PineconeStoreError::MissingTextKey {
            text_key: text_key.to_string(),
        })?
        .to_string();

    let metadata: HashMap<String, Value> = object
        .iter()
        .filter(|(k, _)| k.as_str() != text_key)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(Document {
        id: id.to_string(),
        content: text,
        metadata,
        embedding: None,
    })
}
