//! CLI command implementations

pub mod config;
pub mod item;
pub mod log;
pub mod outfit;
pub mod reconcile;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use wardrobe_core::logging::{self, LoggingGuard};
use wardrobe_core::ports::DocumentStore;
use wardrobe_core::WardrobeContext;

/// An opened context plus the user every command acts for
pub struct Session {
    pub ctx: WardrobeContext,
    pub user_id: String,
    _log_guard: Option<LoggingGuard>,
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    wardrobe_core::config::default_data_dir().context("Could not find home directory")
}

/// Open the context and resolve the acting user
///
/// `--user` wins over `WARDROBE_USER` and settings.json.
pub fn get_session(user_override: Option<String>) -> Result<Session> {
    let data_dir = get_data_dir()?;
    let ctx = WardrobeContext::new(&data_dir)
        .with_context(|| format!("Failed to open wardrobe data in {}", data_dir.display()))?;

    // Logging should never block a command
    let log_guard = logging::init(&data_dir, &ctx.config.log_level).ok();

    let user_id = match user_override.filter(|u| !u.trim().is_empty()) {
        Some(user) => user,
        None => ctx.config.require_user()?.to_string(),
    };

    tracing::debug!(user_id = %user_id, store = ctx.store.name(), "CLI session opened");

    Ok(Session {
        ctx,
        user_id,
        _log_guard: log_guard,
    })
}
