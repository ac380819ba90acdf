//! Outfit service - outfit management

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{dedup_item_ids, normalize_tags, Outfit, Season, WardrobeItem};
use crate::ports::{decode_all, timestamp_string, Collection, CollectionPath, DocumentStore, DocumentWrite};

/// Input for `create_outfit`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOutfit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub items: Vec<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
}

/// Editable outfit fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
    pub items: Option<Vec<String>>,
    pub seasons: Option<Vec<Season>>,
    pub occasions: Option<Vec<String>>,
}

pub struct OutfitService {
    store: Arc<dyn DocumentStore>,
}

impl OutfitService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn collection(user_id: &str) -> CollectionPath {
        CollectionPath::new(user_id, Collection::Outfits)
    }

    /// Create an outfit, returning its id
    pub async fn create_outfit(&self, user_id: &str, new: NewOutfit) -> Result<String> {
        let mut outfit = Outfit::new(new.name.trim(), new.items);
        outfit.validate().map_err(Error::validation)?;
        outfit.description = new.description;
        outfit.notes = new.notes;
        outfit.image = new.image;
        outfit.seasons = new.seasons;
        outfit.occasions = normalize_tags(&new.occasions);
        outfit.favorite = new.favorite;
        outfit.preview_images = self.preview_images(user_id, &outfit.items).await?;
        outfit.created_at = Some(Utc::now());

        let write = DocumentWrite::from_object(&outfit)?;
        let id = self.store.create(&Self::collection(user_id), &write).await?;
        tracing::debug!(user_id, outfit_id = %id, items = outfit.items.len(), "Created outfit");
        Ok(id)
    }

    /// Images of the given items, in item order
    ///
    /// Items that no longer exist or have no image are skipped.
    async fn preview_images(&self, user_id: &str, item_ids: &[String]) -> Result<Vec<String>> {
        let wardrobe = CollectionPath::new(user_id, Collection::Wardrobe);
        let paths: Vec<_> = item_ids.iter().map(|id| wardrobe.doc(id.as_str())).collect();
        let docs = try_join_all(paths.iter().map(|path| self.store.get(path))).await?;

        let mut images = Vec::new();
        for (item_id, doc) in item_ids.iter().zip(docs) {
            let Some(doc) = doc else {
                tracing::warn!(user_id, item_id = %item_id, "Outfit references a missing item");
                continue;
            };
            let item: WardrobeItem = doc.decode()?;
            if let Some(image) = item.image.filter(|i| !i.is_empty()) {
                images.push(image);
            }
        }
        Ok(images)
    }

    pub async fn get_outfits(&self, user_id: &str) -> Result<Vec<Outfit>> {
        let docs = self.store.list(&Self::collection(user_id)).await?;
        decode_all(&docs)
    }

    pub async fn get_outfit(&self, user_id: &str, outfit_id: &str) -> Result<Option<Outfit>> {
        match self.store.get(&Self::collection(user_id).doc(outfit_id)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Apply a partial edit; changing the items refreshes the preview images
    pub async fn update_outfit(&self, user_id: &str, outfit_id: &str, update: OutfitUpdate) -> Result<()> {
        let mut write = DocumentWrite::new();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::validation("outfit name cannot be empty"));
            }
            write = write.set("name", name.trim());
        }
        for (field, value) in [
            ("description", update.description),
            ("notes", update.notes),
            ("image", update.image),
        ] {
            if let Some(value) = value {
                write = write.set(field, value);
            }
        }
        if let Some(items) = update.items {
            let items = dedup_item_ids(&items);
            if items.is_empty() {
                return Err(Error::validation("outfit must contain at least one item"));
            }
            let previews = self.preview_images(user_id, &items).await?;
            write = write.set("items", items).set("previewImages", previews);
        }
        if let Some(seasons) = update.seasons {
            write = write.set("seasons", serde_json::to_value(seasons)?);
        }
        if let Some(occasions) = update.occasions {
            write = write.set("occasions", normalize_tags(&occasions));
        }

        let write = write.set("updatedAt", timestamp_string(Utc::now()));
        self.store
            .update(&Self::collection(user_id).doc(outfit_id), &write)
            .await
    }

    pub async fn delete_outfit(&self, user_id: &str, outfit_id: &str) -> Result<()> {
        self.store
            .delete(&Self::collection(user_id).doc(outfit_id))
            .await?;
        tracing::debug!(user_id, outfit_id, "Deleted outfit");
        Ok(())
    }

    /// Set the favorite flag to `favorite`
    ///
    /// Takes the target value rather than flipping the stored one, so two
    /// clients acting on the same screen state agree.
    pub async fn toggle_outfit_favorite(&self, user_id: &str, outfit_id: &str, favorite: bool) -> Result<()> {
        self.store
            .update(
                &Self::collection(user_id).doc(outfit_id),
                &DocumentWrite::new().set("favorite", favorite),
            )
            .await
    }
}
