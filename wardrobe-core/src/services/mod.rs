//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each one owns
//! a feature area and talks to storage only through the port traits.

pub mod migration;
mod outfit;
mod reconcile;
mod stats;
pub mod usage;
mod wardrobe;

pub use migration::{MigrationResult, MigrationService};
pub use outfit::{NewOutfit, OutfitService, OutfitUpdate};
pub use reconcile::{ReconcileReport, ReconcileService};
pub use stats::{
    compute_streak, ItemStats, OutfitMetrics, OutfitStats, Rated, StatsService, UsageMetrics,
    UsageSummary, WardrobeMetrics, TOP_N,
};
pub use usage::{DailyLogUpdate, LogRequest, TodayOutfit, UsageService, DEFAULT_HISTORY_LIMIT};
pub use wardrobe::{ItemUpdate, WardrobeService};
