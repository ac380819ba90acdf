//! Wardrobe Core - wear logging and usage statistics for a personal wardrobe
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (WardrobeItem, Outfit, DailyLog) and errors
//! - **ports**: Trait definitions for external dependencies (DocumentStore, BlobStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (in-memory, DuckDB, local files)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod logging;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbDocumentStore;
use adapters::local_blob::LocalBlobStore;
use config::Config;
use ports::{BlobStore, DocumentStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Category, DailyLog, Outfit, Season, UsageEntry, WardrobeItem};

pub const DB_FILE_NAME: &str = "wardrobe.duckdb";
pub const BLOB_DIR_NAME: &str = "blobs";

/// Main context for wardrobe operations
///
/// This is the primary entry point for all business logic. It holds
/// the stores, configuration, and all services.
pub struct WardrobeContext {
    pub config: Config,
    pub data_dir: Option<PathBuf>,
    pub store: Arc<dyn DocumentStore>,
    pub wardrobe_service: WardrobeService,
    pub outfit_service: OutfitService,
    pub usage_service: UsageService,
    pub stats_service: StatsService,
    pub reconcile_service: ReconcileService,
}

impl WardrobeContext {
    /// Open the DuckDB store and blob directory under `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let store: Arc<dyn DocumentStore> =
            Arc::new(DuckDbDocumentStore::open(&data_dir.join(DB_FILE_NAME))?);
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(data_dir.join(BLOB_DIR_NAME)));

        let mut context = Self::with_stores(store, Some(blobs), config);
        context.data_dir = Some(data_dir.to_path_buf());
        Ok(context)
    }

    /// Wire the services over caller-provided stores
    pub fn with_stores(
        store: Arc<dyn DocumentStore>,
        blobs: Option<Arc<dyn BlobStore>>,
        config: Config,
    ) -> Self {
        let usage_service = UsageService::new(Arc::clone(&store), blobs)
            .with_history_limit(config.daily_log_limit);

        Self {
            wardrobe_service: WardrobeService::new(Arc::clone(&store)),
            outfit_service: OutfitService::new(Arc::clone(&store)),
            usage_service,
            stats_service: StatsService::new(Arc::clone(&store)),
            reconcile_service: ReconcileService::new(Arc::clone(&store)),
            store,
            config,
            data_dir: None,
        }
    }
}
