//! Blob store port - photo uploads

use async_trait::async_trait;

use crate::domain::result::Result;

/// Opaque reference to an uploaded blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRef(pub String);

impl StorageRef {
    pub fn path(&self) -> &str {
        &self.0
    }
}

/// Binary object storage
///
/// Only the wear logger's photo path uses this, and it treats every
/// failure as "no photo".
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, replacing anything already there
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<StorageRef>;

    /// Resolve a reference to a URL a client can load
    async fn public_url(&self, storage_ref: &StorageRef) -> Result<String>;
}
