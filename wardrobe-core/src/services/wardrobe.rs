//! Wardrobe service - clothing item management

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{normalize_tags, Category, Season, WardrobeItem};
use crate::ports::{decode_all, timestamp_string, Collection, CollectionPath, DocumentStore, DocumentWrite};

/// User-editable item fields; `None` leaves a field unchanged
///
/// Usage counters are deliberately absent: only the wear logger and the
/// reconciler write them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub notes: Option<String>,
    pub seasons: Option<Vec<Season>>,
    pub occasions: Option<Vec<String>>,
    pub favorite: Option<bool>,
}

pub struct WardrobeService {
    store: Arc<dyn DocumentStore>,
}

impl WardrobeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn collection(user_id: &str) -> CollectionPath {
        CollectionPath::new(user_id, Collection::Wardrobe)
    }

    /// Add a new item, returning its id
    ///
    /// Any usage data on the input is discarded; a new item has never been worn.
    pub async fn add_wardrobe_item(&self, user_id: &str, item: WardrobeItem) -> Result<String> {
        let mut item = item;
        item.validate().map_err(Error::validation)?;
        item.name = item.name.trim().to_string();
        item.occasions = normalize_tags(&item.occasions);
        item.clear_usage();
        item.created_at = Some(Utc::now());
        item.updated_at = None;

        let write = DocumentWrite::from_object(&item)?;
        let id = self.store.create(&Self::collection(user_id), &write).await?;
        tracing::debug!(user_id, item_id = %id, category = %item.category, "Added wardrobe item");
        Ok(id)
    }

    /// All items owned by the user, in creation order
    pub async fn get_wardrobe_items(&self, user_id: &str) -> Result<Vec<WardrobeItem>> {
        let docs = self.store.list(&Self::collection(user_id)).await?;
        decode_all(&docs)
    }

    pub async fn get_wardrobe_item(&self, user_id: &str, item_id: &str) -> Result<Option<WardrobeItem>> {
        match self.store.get(&Self::collection(user_id).doc(item_id)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Apply a partial edit to an item
    pub async fn update_wardrobe_item(&self, user_id: &str, item_id: &str, update: ItemUpdate) -> Result<()> {
        let mut write = DocumentWrite::new();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::validation("item name cannot be empty"));
            }
            write = write.set("name", name.trim());
        }
        if let Some(category) = update.category {
            write = write.set("category", category.as_str());
        }
        if let Some(price) = update.price {
            if price.is_sign_negative() {
                return Err(Error::validation("price cannot be negative"));
            }
            write = write.set("price", serde_json::to_value(price)?);
        }
        for (field, value) in [
            ("brand", update.brand),
            ("size", update.size),
            ("color", update.color),
            ("material", update.material),
            ("image", update.image),
            ("notes", update.notes),
        ] {
            if let Some(value) = value {
                write = write.set(field, value);
            }
        }
        if let Some(seasons) = update.seasons {
            write = write.set("seasons", serde_json::to_value(seasons)?);
        }
        if let Some(occasions) = update.occasions {
            write = write.set("occasions", normalize_tags(&occasions));
        }
        if let Some(favorite) = update.favorite {
            write = write.set("favorite", favorite);
        }

        let write = write.set("updatedAt", timestamp_string(Utc::now()));
        self.store
            .update(&Self::collection(user_id).doc(item_id), &write)
            .await
    }

    /// Delete an item
    ///
    /// Outfits that reference it keep the dangling id; the wear logger
    /// tolerates it.
    pub async fn delete_wardrobe_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.store
            .delete(&Self::collection(user_id).doc(item_id))
            .await?;
        tracing::debug!(user_id, item_id, "Deleted wardrobe item");
        Ok(())
    }
}
