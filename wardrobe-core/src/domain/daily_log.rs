//! Daily log domain model
//!
//! A daily log is the ledger entry asserting that an outfit was worn on a
//! calendar date. Wear counters on outfits and items are derived from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Highest accepted rating; 0 means unrated
pub const MAX_RATING: u8 = 5;

/// Read a stored rating, rounding fractional values into `0..=MAX_RATING`
fn deserialize_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|r| r.is_finite())
        .map(|r| r.round().clamp(0.0, MAX_RATING as f64) as u8)
        .unwrap_or(0))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub outfit_id: String,
    /// Item ids of the outfit at the time it was logged
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Store-assigned write time
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyLog {
    /// Best available ordering key: client creation time, then store write time
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.timestamp)
    }
}

/// Order logs newest first by creation time
///
/// Logs with equal (or missing) creation times keep reverse insertion
/// order, so the most recently inserted one comes first. Logs with no
/// timestamp at all sort last.
pub fn sort_most_recent_first(logs: &mut [DailyLog]) {
    logs.reverse();
    logs.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// Validate a rating value
pub fn validate_rating(rating: u8) -> Result<(), String> {
    if rating > MAX_RATING {
        return Err(format!(
            "rating must be between 0 and {}, got {}",
            MAX_RATING, rating
        ));
    }
    Ok(())
}

/// Format a calendar date the way it is stored (`YYYY-MM-DD`)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
