//! Outfit domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::item::{deserialize_counter, Season};

/// Member reference as found in stored outfit documents
///
/// Older records hold `{ "id": "..." }` objects instead of bare ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRef {
    Id(String),
    Object { id: String },
}

impl ItemRef {
    fn into_id(self) -> String {
        match self {
            ItemRef::Id(id) | ItemRef::Object { id } => id,
        }
    }
}

/// Extract member ids from a raw `items` value
///
/// Entries that are neither an id string nor an `{ "id": ... }` object are
/// skipped, as is anything that isn't an array.
pub fn item_ids_from_json(value: &JsonValue) -> Vec<String> {
    let ids: Vec<String> = value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| ItemRef::deserialize(entry).ok())
                .map(ItemRef::into_id)
                .collect()
        })
        .unwrap_or_default();
    dedup_item_ids(&ids)
}

/// Decode an outfit's `items` field into a flat, de-duplicated id list
fn deserialize_item_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<JsonValue> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().map(item_ids_from_json).unwrap_or_default())
}

/// Remove blanks and duplicates from an item id list, keeping first occurrence
pub fn dedup_item_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

/// A named set of wardrobe items
///
/// `preview_images` is copied from member items when the outfit is created
/// or its item list is edited; it does not follow later item edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_item_ids")]
    pub items: Vec<String>,
    #[serde(default)]
    pub preview_images: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub occasions: Vec<String>,

    // Usage cache, same accounting as WardrobeItem
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub wear_count: u32,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub total_rating: u32,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Outfit {
    pub fn new(name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: None,
            notes: None,
            image: None,
            items: dedup_item_ids(&items),
            preview_images: Vec::new(),
            favorite: false,
            seasons: Vec::new(),
            occasions: Vec::new(),
            wear_count: 0,
            last_worn: None,
            total_rating: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.wear_count == 0 {
            return None;
        }
        Some(self.total_rating as f64 / self.wear_count as f64)
    }

    /// Validate outfit data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("outfit name cannot be empty");
        }
        if self.items.is_empty() {
            return Err("outfit must contain at least one item");
        }
        Ok(())
    }
}
