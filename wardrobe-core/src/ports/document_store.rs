//! Document store port - per-user document collections
//!
//! Models a hosted document database: documents are JSON objects grouped in
//! collections under `users/{userId}/...`, written through field-level
//! operations that the store applies atomically to a single document.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::domain::result::{Error, Result};

/// JSON object body of a stored document
pub type JsonMap = Map<String, JsonValue>;

/// Collections owned by each user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Wardrobe,
    Outfits,
    DailyLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Wardrobe => "wardrobe",
            Collection::Outfits => "outfits",
            Collection::DailyLogs => "dailyLogs",
        }
    }
}

/// `users/{userId}/{collection}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    pub user_id: String,
    pub collection: Collection,
}

impl CollectionPath {
    pub fn new(user_id: impl Into<String>, collection: Collection) -> Self {
        Self {
            user_id: user_id.into(),
            collection,
        }
    }

    /// Path of a document inside this collection
    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.user_id, self.collection.as_str())
    }
}

/// `users/{userId}/{collection}/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: JsonMap,
}

impl StoredDocument {
    /// Decode into a domain type, injecting the document id as `id`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut data = self.data.clone();
        data.insert("id".to_string(), JsonValue::String(self.id.clone()));
        Ok(serde_json::from_value(JsonValue::Object(data))?)
    }
}

/// Decode a batch of documents, failing on the first one that doesn't fit `T`
pub fn decode_all<T: DeserializeOwned>(docs: &[StoredDocument]) -> Result<Vec<T>> {
    docs.iter()
        .map(|doc| {
            doc.decode()
                .map_err(|e| Error::store(format!("Cannot decode document {}: {}", doc.id, e)))
        })
        .collect()
}

/// A single field operation within a write
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Replace the field
    Set(JsonValue),
    /// Add to a numeric field; a missing or non-numeric field counts as 0
    Increment(i64),
    /// Append each value not already present; a missing or non-array field counts as empty
    ArrayUnion(Vec<JsonValue>),
    /// The store's write time
    ServerTimestamp,
}

/// Ordered list of field operations applied atomically to one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentWrite {
    fields: Vec<(String, FieldValue)>,
}

impl DocumentWrite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a write that sets every top-level field of a serializable object
    ///
    /// The `id` field is dropped: ids live in the document path, not the body.
    pub fn from_object<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            JsonValue::Object(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .filter(|(key, _)| key != "id")
                    .map(|(key, v)| (key, FieldValue::Set(v)))
                    .collect(),
            }),
            other => Err(Error::validation(format!(
                "document body must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.push((field.into(), FieldValue::Set(value.into())));
        self
    }

    pub fn increment(mut self, field: impl Into<String>, by: i64) -> Self {
        self.fields.push((field.into(), FieldValue::Increment(by)));
        self
    }

    pub fn array_union(mut self, field: impl Into<String>, values: Vec<JsonValue>) -> Self {
        self.fields.push((field.into(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), FieldValue::ServerTimestamp));
        self
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Apply every operation, in order, to a document body
    pub fn apply(&self, doc: &mut JsonMap, now: DateTime<Utc>) {
        for (field, op) in &self.fields {
            match op {
                FieldValue::Set(value) => {
                    doc.insert(field.clone(), value.clone());
                }
                FieldValue::Increment(by) => {
                    let next = increment_value(doc.get(field), *by);
                    doc.insert(field.clone(), next);
                }
                FieldValue::ArrayUnion(values) => {
                    let mut current = match doc.remove(field) {
                        Some(JsonValue::Array(items)) => items,
                        _ => Vec::new(),
                    };
                    for value in values {
                        if !current.contains(value) {
                            current.push(value.clone());
                        }
                    }
                    doc.insert(field.clone(), JsonValue::Array(current));
                }
                FieldValue::ServerTimestamp => {
                    doc.insert(field.clone(), JsonValue::String(timestamp_string(now)));
                }
            }
        }
    }
}

/// Add `by` to a stored number
///
/// Whole-number floats (as written by clients that only have doubles) stay
/// integers; other floats keep their fraction. A missing or non-numeric
/// field counts as 0.
fn increment_value(current: Option<&JsonValue>, by: i64) -> JsonValue {
    match current {
        Some(value) if value.is_i64() || value.is_u64() => match value.as_i64() {
            Some(n) => JsonValue::from(n.saturating_add(by)),
            None => JsonValue::from(value.as_f64().unwrap_or(0.0) + by as f64),
        },
        Some(value) => match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                JsonValue::from((f as i64).saturating_add(by))
            }
            Some(f) => JsonValue::from(f + by as f64),
            None => JsonValue::from(by),
        },
        None => JsonValue::from(by),
    }
}

/// RFC 3339 UTC timestamp with millisecond precision, as stored in documents
pub fn timestamp_string(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Query predicate over a single top-level field
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value
    Equals(String, JsonValue),
    /// Field is an array containing the value
    ArrayContains(String, JsonValue),
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::Equals(field.into(), value.into())
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Filter::ArrayContains(field.into(), value.into())
    }

    pub fn matches(&self, doc: &JsonMap) -> bool {
        match self {
            Filter::Equals(field, value) => doc.get(field) == Some(value),
            Filter::ArrayContains(field, value) => doc
                .get(field)
                .and_then(JsonValue::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

/// Document store abstraction
///
/// Implementations (adapters) provide the storage. Every `create` and
/// `update` is atomic for the one document it touches; nothing spans
/// documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name (e.g., "memory", "duckdb")
    fn name(&self) -> &str;

    /// Create a document with a store-assigned id
    async fn create(&self, collection: &CollectionPath, write: &DocumentWrite) -> Result<String>;

    /// Fetch a document, `None` if it doesn't exist
    async fn get(&self, doc: &DocPath) -> Result<Option<StoredDocument>>;

    /// Apply a write to an existing document
    ///
    /// Fails with `Error::NotFound` if the document doesn't exist.
    async fn update(&self, doc: &DocPath, write: &DocumentWrite) -> Result<()>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, doc: &DocPath) -> Result<()>;

    /// All documents of a collection, in insertion order
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDocument>>;

    /// Documents matching a filter, in insertion order
    async fn query(
        &self,
        collection: &CollectionPath,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>> {
        let docs = self.list(collection).await?;
        Ok(docs.into_iter().filter(|d| filter.matches(&d.data)).collect())
    }
}
