//! In-memory document store
//!
//! Keeps every collection in a mutex-guarded map. Used by tests and by
//! callers that don't need persistence.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{CollectionPath, DocPath, DocumentStore, DocumentWrite, JsonMap, StoredDocument};

/// Documents of one collection, in insertion order
type CollectionDocs = Vec<(String, JsonMap)>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<CollectionPath, CollectionDocs>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CollectionPath, CollectionDocs>>> {
        self.collections
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))
    }

    /// Insert a document under a caller-chosen id, replacing any existing one
    ///
    /// Useful for seeding fixtures with known ids.
    pub fn insert_with_id(&self, collection: &CollectionPath, id: &str, write: &DocumentWrite) -> Result<()> {
        let mut collections = self.lock()?;
        let docs = collections.entry(collection.clone()).or_default();
        let mut data = JsonMap::new();
        write.apply(&mut data, Utc::now());
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = data,
            None => docs.push((id.to_string(), data)),
        }
        Ok(())
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &CollectionPath) -> usize {
        self.lock()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, collection: &CollectionPath, write: &DocumentWrite) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut data = JsonMap::new();
        write.apply(&mut data, Utc::now());

        let mut collections = self.lock()?;
        collections
            .entry(collection.clone())
            .or_default()
            .push((id.clone(), data));
        Ok(id)
    }

    async fn get(&self, doc: &DocPath) -> Result<Option<StoredDocument>> {
        let collections = self.lock()?;
        Ok(collections.get(&doc.collection).and_then(|docs| {
            docs.iter()
                .find(|(id, _)| *id == doc.id)
                .map(|(id, data)| StoredDocument {
                    id: id.clone(),
                    data: data.clone(),
                })
        }))
    }

    async fn update(&self, doc: &DocPath, write: &DocumentWrite) -> Result<()> {
        let mut collections = self.lock()?;
        let data = collections
            .get_mut(&doc.collection)
            .and_then(|docs| docs.iter_mut().find(|(id, _)| *id == doc.id))
            .map(|(_, data)| data)
            .ok_or_else(|| Error::not_found(doc.to_string()))?;
        write.apply(data, Utc::now());
        Ok(())
    }

    async fn delete(&self, doc: &DocPath) -> Result<()> {
        let mut collections = self.lock()?;
        if let Some(docs) = collections.get_mut(&doc.collection) {
            docs.retain(|(id, _)| *id != doc.id);
        }
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDocument>> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
