//! Wardrobe item domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Read a cached counter
///
/// Older records may hold counters as doubles (`2.0`); those are rounded.
/// Missing, null, negative or non-finite values read as 0.
pub(crate) fn deserialize_counter<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// Clothing category
///
/// Stored as a lowercase string. Strings that don't match a known category
/// decode as `Other` instead of failing, so older or hand-edited records
/// still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    Underwear,
    Activewear,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Tops,
        Category::Bottoms,
        Category::Dresses,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
        Category::Underwear,
        Category::Activewear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::Underwear => "underwear",
            Category::Activewear => "activewear",
            Category::Other => "other",
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(Category::Other)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    All,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::All => "all",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            "all" => Ok(Season::All),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

/// One entry of an item's append-only wear history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub date: NaiveDate,
    pub outfit_id: String,
    pub log_id: String,
}

/// A single clothing or accessory item owned by a user
///
/// `wear_count`, `total_rating`, `last_worn` and `usage_history` are a
/// cache of the daily-log ledger, maintained incrementally by the wear
/// logger. They may lag the ledger after a partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub favorite: bool,

    // =========================================================================
    // Usage cache
    // =========================================================================
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub wear_count: u32,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    /// Sum of every rating given across wears
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub total_rating: u32,
    #[serde(default)]
    pub usage_history: Vec<UsageEntry>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WardrobeItem {
    /// Create a new item with required fields
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            category,
            brand: None,
            size: None,
            color: None,
            material: None,
            price: None,
            image: None,
            notes: None,
            seasons: Vec::new(),
            occasions: Vec::new(),
            favorite: false,
            wear_count: 0,
            last_worn: None,
            total_rating: 0,
            usage_history: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Mean rating across all wears, if the item has been worn
    pub fn average_rating(&self) -> Option<f64> {
        if self.wear_count == 0 {
            return None;
        }
        Some(self.total_rating as f64 / self.wear_count as f64)
    }

    /// Price divided by wear count, rounded to cents
    ///
    /// `None` when there is no price or the item has never been worn.
    pub fn cost_per_wear(&self) -> Option<Decimal> {
        let price = self.price?;
        if self.wear_count == 0 {
            return None;
        }
        Some((price / Decimal::from(self.wear_count)).round_dp(2))
    }

    /// Reset the usage cache to its never-worn state
    pub fn clear_usage(&mut self) {
        self.wear_count = 0;
        self.last_worn = None;
        self.total_rating = 0;
        self.usage_history.clear();
    }

    /// Validate item data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("item name cannot be empty");
        }
        if matches!(self.price, Some(p) if p.is_sign_negative()) {
            return Err("price cannot be negative");
        }
        Ok(())
    }
}

/// Normalize free-form tags: trim, drop empties, deduplicate keeping first occurrence
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tag in tags {
        let trimmed = tag.trim().to_string();
        if !trimmed.is_empty() && seen.insert(trimmed.clone()) {
            result.push(trimmed);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_decodes_unknown_as_other() {
        let c: Category = serde_json::from_value(json!("Jumpsuits")).unwrap();
        assert_eq!(c, Category::Other);
        let c: Category = serde_json::from_value(json!("Shoes")).unwrap();
        assert_eq!(c, Category::Shoes);
        assert_eq!(serde_json::to_value(Category::Outerwear).unwrap(), json!("outerwear"));
    }

    #[test]
    fn test_average_rating() {
        let mut item = WardrobeItem::new("Denim jacket", Category::Outerwear);
        assert_eq!(item.average_rating(), None);

        item.wear_count = 4;
        item.total_rating = 18;
        assert_eq!(item.average_rating(), Some(4.5));
    }

    #[test]
    fn test_cost_per_wear() {
        let mut item = WardrobeItem::new("Boots", Category::Shoes);
        assert_eq!(item.cost_per_wear(), None);

        item.price = Some(Decimal::new(12000, 2));
        assert_eq!(item.cost_per_wear(), None, "unworn item has no cost per wear");

        item.wear_count = 7;
        assert_eq!(item.cost_per_wear(), Some(Decimal::new(1714, 2)));
    }

    #[test]
    fn test_item_validation() {
        let mut item = WardrobeItem::new("Scarf", Category::Accessories);
        assert!(item.validate().is_ok());

        item.price = Some(Decimal::new(-1, 0));
        assert!(item.validate().is_err());

        item.price = None;
        item.name = "  ".to_string();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_decode_sparse_document() {
        let item: WardrobeItem = serde_json::from_value(json!({
            "id": "i1",
            "name": "Tee",
            "category": "tops",
            "price": 19.99
        }))
        .unwrap();
        assert_eq!(item.wear_count, 0);
        assert!(item.usage_history.is_empty());
        assert_eq!(item.price, Some(Decimal::new(1999, 2)));
    }

    #[test]
    fn test_decode_float_counters() {
        let item: WardrobeItem = serde_json::from_value(json!({
            "name": "Tee",
            "wearCount": 2.0,
            "totalRating": 9.0
        }))
        .unwrap();
        assert_eq!(item.wear_count, 2);
        assert_eq!(item.total_rating, 9);

        let item: WardrobeItem =
            serde_json::from_value(json!({ "name": "Tee", "wearCount": null, "totalRating": -3 }))
                .unwrap();
        assert_eq!(item.wear_count, 0);
        assert_eq!(item.total_rating, 0);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            "Work".to_string(),
            "  Casual ".to_string(),
            "Work".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["Work", "Casual"]);
    }
}
