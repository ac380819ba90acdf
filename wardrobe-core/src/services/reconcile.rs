//! Reconcile service - rebuild cached wear counters from the daily log ledger
//!
//! `log_daily_outfit` updates counters incrementally and best effort, so a
//! failed write or an edited rating leaves them stale. This pass recomputes
//! wearCount, totalRating and lastWorn for every outfit and item.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::{DailyLog, Outfit, WardrobeItem};
use crate::ports::{
    decode_all, timestamp_string, Collection, CollectionPath, DocumentStore, DocumentWrite,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub logs_scanned: usize,
    pub outfits_updated: usize,
    pub items_updated: usize,
    /// Logs whose outfit no longer exists
    pub dangling_logs: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    wear_count: u32,
    total_rating: u32,
    last_worn: Option<DateTime<Utc>>,
}

impl Tally {
    fn add(&mut self, rating: u8, worn_at: DateTime<Utc>) {
        self.wear_count += 1;
        self.total_rating += rating as u32;
        self.last_worn = self.last_worn.max(Some(worn_at));
    }

    fn write(&self) -> DocumentWrite {
        let last_worn = match self.last_worn {
            Some(ts) => JsonValue::String(timestamp_string(ts)),
            None => JsonValue::Null,
        };
        DocumentWrite::new()
            .set("wearCount", self.wear_count)
            .set("totalRating", self.total_rating)
            .set("lastWorn", last_worn)
    }
}

/// When a log says the outfit was worn
fn worn_at(log: &DailyLog) -> DateTime<Utc> {
    log.sort_key()
        .unwrap_or_else(|| log.date.and_time(chrono::NaiveTime::MIN).and_utc())
}

pub struct ReconcileService {
    store: Arc<dyn DocumentStore>,
}

impl ReconcileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Recompute counters from the ledger and write the ones that drifted
    ///
    /// A log's items come from its snapshot, or from the outfit's current
    /// items when the snapshot is empty. Logs pointing at a deleted outfit
    /// are reported as dangling; their snapshot still counts for the items.
    pub async fn reconcile_counters(&self, user_id: &str) -> Result<ReconcileReport> {
        let logs_path = CollectionPath::new(user_id, Collection::DailyLogs);
        let outfits_path = CollectionPath::new(user_id, Collection::Outfits);
        let items_path = CollectionPath::new(user_id, Collection::Wardrobe);

        let (log_docs, outfit_docs, item_docs) = tokio::try_join!(
            self.store.list(&logs_path),
            self.store.list(&outfits_path),
            self.store.list(&items_path),
        )?;
        let logs: Vec<DailyLog> = decode_all(&log_docs)?;
        let outfits: Vec<Outfit> = decode_all(&outfit_docs)?;
        let items: Vec<WardrobeItem> = decode_all(&item_docs)?;

        let outfits_by_id: HashMap<&str, &Outfit> =
            outfits.iter().map(|o| (o.id.as_str(), o)).collect();

        let mut report = ReconcileReport {
            logs_scanned: logs.len(),
            ..Default::default()
        };
        let mut outfit_tallies: HashMap<&str, Tally> = HashMap::new();
        let mut item_tallies: HashMap<&str, Tally> = HashMap::new();

        for log in &logs {
            let at = worn_at(log);
            let outfit = outfits_by_id.get(log.outfit_id.as_str()).copied();
            match outfit {
                Some(outfit) => outfit_tallies
                    .entry(outfit.id.as_str())
                    .or_default()
                    .add(log.rating, at),
                None => report.dangling_logs += 1,
            }

            // The snapshot outlives the outfit; the current members are only a fallback
            let members: &[String] = match (log.items.is_empty(), outfit) {
                (false, _) => &log.items,
                (true, Some(outfit)) => &outfit.items,
                (true, None) => &[],
            };
            for item_id in members {
                item_tallies
                    .entry(item_id.as_str())
                    .or_default()
                    .add(log.rating, at);
            }
        }

        for outfit in &outfits {
            let expected = outfit_tallies.get(outfit.id.as_str()).copied().unwrap_or_default();
            let cached = Tally {
                wear_count: outfit.wear_count,
                total_rating: outfit.total_rating,
                last_worn: outfit.last_worn,
            };
            if cached != expected {
                self.store
                    .update(&outfits_path.doc(outfit.id.as_str()), &expected.write())
                    .await?;
                tracing::info!(user_id, outfit_id = %outfit.id, "Reconciled outfit counters");
                report.outfits_updated += 1;
            }
        }

        for item in &items {
            let expected = item_tallies.get(item.id.as_str()).copied().unwrap_or_default();
            let cached = Tally {
                wear_count: item.wear_count,
                total_rating: item.total_rating,
                last_worn: item.last_worn,
            };
            if cached != expected {
                self.store
                    .update(&items_path.doc(item.id.as_str()), &expected.write())
                    .await?;
                tracing::info!(user_id, item_id = %item.id, "Reconciled item counters");
                report.items_updated += 1;
            }
        }

        if report.dangling_logs > 0 {
            tracing::warn!(user_id, dangling = report.dangling_logs, "Daily logs reference missing outfits");
        }
        Ok(report)
    }
}
