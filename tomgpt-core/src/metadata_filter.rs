use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MetadataFilter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl MetadataFilter {
    /// Restricts a search to one document collection stored under `key`.
    pub fn collection(key: impl Into<String>, collection_id: impl Into<String>) -> Self {
        MetadataFilter::Eq(key.into(), Value::String(collection_id.into()))
    }

    /// Like [`collection`](Self::collection) for several ids at once; `None`
    /// when `ids` is empty.
    pub fn collections<I, S>(key: impl Into<String>, ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        match ids.len() {
            0 => None,
            1 => ids.pop().map(|id| Self::collection(key, id)),
            _ => Some(MetadataFilter::In(
                key.into(),
                ids.into_iter().map(Value::String).collect(),
            )),
        }
    }

    /// Local evaluation, for stores that filter in process. A missing key
    /// never matches.
    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        match self {
            MetadataFilter::Eq(key, expected) => metadata.get(key) == Some(expected),
            MetadataFilter::In(key, allowed) => metadata
                .get(key)
                .is_some_and(|actual| allowed.contains(actual)),
        }
    }
}
