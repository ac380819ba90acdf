//! Local filesystem blob store
//!
//! Stores blobs as plain files under a root directory. The public URL of a
//! blob is its `file://` URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::{BlobStore, StorageRef};

pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a blob path under the root, rejecting anything that would escape it
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(Error::blob(format!("invalid blob path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<StorageRef> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(path = %target.display(), size = bytes.len(), "Stored blob");
        Ok(StorageRef(path.trim_start_matches('/').to_string()))
    }

    async fn public_url(&self, storage_ref: &StorageRef) -> Result<String> {
        let target = self.resolve(storage_ref.path())?;
        let absolute = if target.is_absolute() {
            target
        } else {
            std::env::current_dir()?.join(target)
        };
        Url::from_file_path(&absolute)
            .map(|u| u.to_string())
            .map_err(|_| Error::blob(format!("cannot build URL for {}", absolute.display())))
    }
}
