//! Usage service - daily wear logging
//!
//! The daily log is the ledger. Logging an outfit reads its member list,
//! writes the log with that snapshot, and only then updates the wear
//! counters cached on the outfit and its items.
//! Counter writes are best effort: failures are logged, never returned, so a
//! caller that got a log id back knows the entry is saved.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::result::{Error, Result};
use crate::domain::{
    format_date, item_ids_from_json, sort_most_recent_first, validate_rating, DailyLog, Outfit,
};
use crate::ports::{
    decode_all, timestamp_string, BlobStore, Collection, CollectionPath, DocPath, DocumentStore,
    DocumentWrite, Filter,
};

/// Default number of logs returned by `get_daily_logs`
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Input for `log_daily_outfit`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub outfit_id: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Already-hosted photo references
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    /// Raw photo to upload through the blob store
    #[serde(skip)]
    pub photo_upload: Option<Vec<u8>>,
}

impl LogRequest {
    pub fn new(outfit_id: impl Into<String>) -> Self {
        Self {
            outfit_id: outfit_id.into(),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_photos(mut self, photos: Vec<String>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
        self
    }

    pub fn with_photo_upload(mut self, bytes: Vec<u8>) -> Self {
        self.photo_upload = Some(bytes);
        self
    }
}

/// Fields of an existing log that can be changed after the fact
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogUpdate {
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub photos: Option<Vec<String>>,
    pub occasion: Option<String>,
}

/// Today's log joined with the outfit it references
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayOutfit {
    #[serde(flatten)]
    pub log: DailyLog,
    /// `None` when the log points at an outfit that no longer exists
    pub outfit: Option<Outfit>,
}

/// Result of reading the logged outfit
enum OutfitLookup {
    Found(Vec<String>),
    Missing,
    Unreadable(CounterFailure),
}

/// A denormalized write that didn't land
#[derive(Debug, Clone)]
struct CounterFailure {
    target: String,
    error: String,
}

pub struct UsageService {
    store: Arc<dyn DocumentStore>,
    blobs: Option<Arc<dyn BlobStore>>,
    history_limit: usize,
}

impl UsageService {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Option<Arc<dyn BlobStore>>) -> Self {
        Self {
            store,
            blobs,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Record that an outfit was worn today and bump its wear counters
    ///
    /// Returns the new log id. Only a failure to write the log itself is an
    /// error. A dangling `outfit_id` keeps the log and skips the counters.
    /// Nothing stops a second log for the same day; see `update_daily_log`
    /// for amending today's entry instead.
    pub async fn log_daily_outfit(&self, user_id: &str, request: LogRequest) -> Result<String> {
        self.log_daily_outfit_at(user_id, request, Utc::now()).await
    }

    /// `log_daily_outfit` with an explicit wall-clock time
    pub async fn log_daily_outfit_at(
        &self,
        user_id: &str,
        request: LogRequest,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let rating = request.rating.unwrap_or(0);
        validate_rating(rating).map_err(Error::validation)?;
        if request.outfit_id.trim().is_empty() {
            return Err(Error::validation("outfit id cannot be empty"));
        }
        let today = now.date_naive();

        // Looked up before the ledger write so the log carries its item snapshot
        let outfit_path =
            CollectionPath::new(user_id, Collection::Outfits).doc(request.outfit_id.as_str());
        let lookup = self.lookup_outfit(&outfit_path).await;
        let snapshot = match &lookup {
            OutfitLookup::Found(item_ids) => item_ids.clone(),
            OutfitLookup::Missing | OutfitLookup::Unreadable(_) => Vec::new(),
        };

        let mut photos = request.photos.clone();
        if let Some(bytes) = &request.photo_upload {
            if let Some(url) = self.upload_photo(user_id, bytes, now).await {
                photos.push(url);
            }
        }

        let mut write = DocumentWrite::new()
            .set("outfitId", request.outfit_id.as_str())
            .set("date", format_date(today))
            .set("rating", rating)
            .set("notes", request.notes.clone().unwrap_or_default())
            .set("photos", photos)
            .set("items", snapshot);
        if let Some(occasion) = request.occasion.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
            write = write.set("occasion", occasion);
        }
        let write = write
            .set("createdAt", timestamp_string(now))
            .server_timestamp("timestamp");

        let logs = CollectionPath::new(user_id, Collection::DailyLogs);
        let log_id = self.store.create(&logs, &write).await?;
        tracing::info!(user_id, log_id = %log_id, outfit_id = %request.outfit_id, rating, "Logged daily outfit");

        let failures = match lookup {
            OutfitLookup::Found(item_ids) => {
                self.update_usage_counters(user_id, &log_id, &outfit_path, &item_ids, rating, now)
                    .await
            }
            OutfitLookup::Missing => {
                tracing::warn!(user_id, outfit_id = %request.outfit_id, log_id = %log_id, "Outfit not found, usage counters unchanged");
                Vec::new()
            }
            OutfitLookup::Unreadable(failure) => vec![failure],
        };
        if !failures.is_empty() {
            for failure in &failures {
                tracing::warn!(target_doc = %failure.target, error = %failure.error, "Usage counter update failed");
            }
            tracing::warn!(
                log_id = %log_id,
                failed = failures.len(),
                "Daily log saved but some usage counters were not updated"
            );
        }

        Ok(log_id)
    }

    /// Fetch an outfit's member ids
    ///
    /// Only `items` is read; the rest of the document may not decode.
    async fn lookup_outfit(&self, outfit_path: &DocPath) -> OutfitLookup {
        match self.store.get(outfit_path).await {
            Ok(Some(doc)) => OutfitLookup::Found(
                doc.data.get("items").map(item_ids_from_json).unwrap_or_default(),
            ),
            Ok(None) => OutfitLookup::Missing,
            Err(e) => OutfitLookup::Unreadable(CounterFailure {
                target: outfit_path.to_string(),
                error: e.to_string(),
            }),
        }
    }

    /// Fan the new log out to the outfit and item counters
    async fn update_usage_counters(
        &self,
        user_id: &str,
        log_id: &str,
        outfit_path: &DocPath,
        item_ids: &[String],
        rating: u8,
        now: DateTime<Utc>,
    ) -> Vec<CounterFailure> {
        let outfit_id = outfit_path.id.as_str();
        let mut failures = Vec::new();
        let last_worn = timestamp_string(now);
        let today = format_date(now.date_naive());

        let bump_outfit = DocumentWrite::new()
            .increment("wearCount", 1)
            .increment("totalRating", rating as i64)
            .set("lastWorn", last_worn.as_str());
        if let Err(e) = self.store.update(outfit_path, &bump_outfit).await {
            tracing::error!(outfit_id, error = %e, "Failed to update outfit wear count");
            failures.push(CounterFailure {
                target: outfit_path.to_string(),
                error: e.to_string(),
            });
        }

        let wardrobe = CollectionPath::new(user_id, Collection::Wardrobe);
        let item_updates = item_ids.iter().map(|item_id| {
            let item_path = wardrobe.doc(item_id.as_str());
            let write = DocumentWrite::new()
                .increment("wearCount", 1)
                .increment("totalRating", rating as i64)
                .set("lastWorn", last_worn.as_str())
                .array_union(
                    "usageHistory",
                    vec![json!({ "date": today, "outfitId": outfit_id, "logId": log_id })],
                );
            async move {
                self.store
                    .update(&item_path, &write)
                    .await
                    .map_err(|e| CounterFailure {
                        target: item_path.to_string(),
                        error: e.to_string(),
                    })
            }
        });

        for result in join_all(item_updates).await {
            if let Err(failure) = result {
                failures.push(failure);
            }
        }

        tracing::debug!(
            outfit_id,
            items = item_ids.len(),
            failed = failures.len(),
            "Usage counters updated"
        );
        failures
    }

    /// Upload a log photo, returning its public URL
    ///
    /// Any failure is logged and yields `None`: a missing photo never blocks the log.
    async fn upload_photo(&self, user_id: &str, bytes: &[u8], now: DateTime<Utc>) -> Option<String> {
        let Some(blobs) = &self.blobs else {
            tracing::warn!(user_id, "No blob store configured, dropping log photo");
            return None;
        };

        let path = format!("users/{}/outfitLogs/{}.jpg", user_id, now.timestamp_millis());
        let storage_ref = match blobs.upload(&path, bytes).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Photo upload failed");
                return None;
            }
        };
        match blobs.public_url(&storage_ref).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Could not resolve photo URL");
                None
            }
        }
    }

    /// Most recent logs first, capped at `limit` (or the configured default)
    pub async fn get_daily_logs(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<DailyLog>> {
        let logs = CollectionPath::new(user_id, Collection::DailyLogs);
        let docs = self.store.list(&logs).await?;
        let mut logs: Vec<DailyLog> = decode_all(&docs)?;
        sort_most_recent_first(&mut logs);
        logs.truncate(limit.unwrap_or(self.history_limit));
        Ok(logs)
    }

    /// Today's log (the most recent one if there are several) with its outfit
    pub async fn get_today_outfit(&self, user_id: &str) -> Result<Option<TodayOutfit>> {
        self.get_outfit_worn_on(user_id, Utc::now().date_naive()).await
    }

    /// The log for `date` (the most recent one if there are several) with its outfit
    pub async fn get_outfit_worn_on(&self, user_id: &str, date: NaiveDate) -> Result<Option<TodayOutfit>> {
        let logs = CollectionPath::new(user_id, Collection::DailyLogs);
        let docs = self
            .store
            .query(&logs, &Filter::equals("date", format_date(date)))
            .await?;
        let mut matches: Vec<DailyLog> = decode_all(&docs)?;
        sort_most_recent_first(&mut matches);

        let Some(log) = matches.into_iter().next() else {
            return Ok(None);
        };

        let outfit_path = CollectionPath::new(user_id, Collection::Outfits).doc(log.outfit_id.as_str());
        let outfit = match self.store.get(&outfit_path).await? {
            Some(doc) => Some(doc.decode::<Outfit>()?),
            None => None,
        };

        Ok(Some(TodayOutfit { log, outfit }))
    }

    /// Amend an existing log
    ///
    /// Wear counters are not touched; a changed rating reaches the cached
    /// totals only through `ReconcileService::reconcile_counters`.
    pub async fn update_daily_log(&self, user_id: &str, log_id: &str, update: DailyLogUpdate) -> Result<()> {
        let mut write = DocumentWrite::new();
        if let Some(rating) = update.rating {
            validate_rating(rating).map_err(Error::validation)?;
            write = write.set("rating", rating);
        }
        if let Some(notes) = update.notes {
            write = write.set("notes", notes);
        }
        if let Some(photos) = update.photos {
            write = write.set("photos", photos);
        }
        if let Some(occasion) = update.occasion {
            write = write.set("occasion", occasion);
        }
        let write = write.set("updatedAt", timestamp_string(Utc::now()));

        let log_path = CollectionPath::new(user_id, Collection::DailyLogs).doc(log_id);
        self.store.update(&log_path, &write).await?;
        tracing::debug!(user_id, log_id, "Updated daily log");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::adapters::local_blob::LocalBlobStore;
    use crate::adapters::memory::MemoryDocumentStore;

    fn outfit_path(user_id: &str) -> CollectionPath {
        CollectionPath::new(user_id, Collection::Outfits)
    }

    #[tokio::test]
    async fn test_photo_is_uploaded_under_user_prefix() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert_with_id(
                &outfit_path("u1"),
                "o1",
                &DocumentWrite::new().set("name", "Gym").set("items", vec!["shorts"]),
            )
            .unwrap();
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(dir.path()));
        let service = UsageService::new(store.clone(), Some(blobs));

        let now = Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap();
        let log_id = service
            .log_daily_outfit_at("u1", LogRequest::new("o1").with_photo_upload(b"jpeg".to_vec()), now)
            .await
            .unwrap();

        let stored = dir
            .path()
            .join(format!("users/u1/outfitLogs/{}.jpg", now.timestamp_millis()));
        assert_eq!(std::fs::read(&stored).unwrap(), b"jpeg");

        let log: DailyLog = store
            .get(&CollectionPath::new("u1", Collection::DailyLogs).doc(log_id))
            .await
            .unwrap()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!(log.photos.len(), 1);
        assert!(log.photos[0].starts_with("file://"));
        assert_eq!(log.date, now.date_naive());
    }

    #[tokio::test]
    async fn test_photo_dropped_without_blob_store() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = UsageService::new(store.clone(), None);

        let log_id = service
            .log_daily_outfit("u1", LogRequest::new("o1").with_photo_upload(vec![1, 2, 3]))
            .await
            .unwrap();
        let log: DailyLog = store
            .get(&CollectionPath::new("u1", Collection::DailyLogs).doc(log_id))
            .await
            .unwrap()
            .unwrap()
            .decode()
            .unwrap();
        assert!(log.photos.is_empty());
    }

    #[tokio::test]
    async fn test_blank_outfit_id_is_rejected() {
        let service = UsageService::new(Arc::new(MemoryDocumentStore::new()), None);
        let err = service
            .log_daily_outfit("u1", LogRequest::new("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_history_limit_applies_by_default() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = UsageService::new(store, None).with_history_limit(2);
        for day in 1..=3 {
            let now = Utc.with_ymd_and_hms(2024, 7, day, 6, 0, 0).unwrap();
            service
                .log_daily_outfit_at("u1", LogRequest::new("o1"), now)
                .await
                .unwrap();
        }
        assert_eq!(service.get_daily_logs("u1", None).await.unwrap().len(), 2);
        assert_eq!(service.get_daily_logs("u1", Some(10)).await.unwrap().len(), 3);
    }
}
