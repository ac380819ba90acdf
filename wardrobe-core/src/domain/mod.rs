//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod daily_log;
mod item;
mod outfit;
pub mod result;

pub use daily_log::{
    format_date, sort_most_recent_first, validate_rating, DailyLog, MAX_RATING,
};
pub use item::{normalize_tags, Category, Season, UsageEntry, WardrobeItem};
pub use outfit::{dedup_item_ids, item_ids_from_json, Outfit};
