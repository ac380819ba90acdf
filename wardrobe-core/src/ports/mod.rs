//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod blob_store;
mod document_store;

pub use blob_store::{BlobStore, StorageRef};
pub use document_store::{
    decode_all, timestamp_string, Collection, CollectionPath, DocPath, DocumentStore,
    DocumentWrite, FieldValue, Filter, JsonMap, StoredDocument,
};
