//! Stats service - usage aggregation and per-entity statistics
//!
//! Every read here loads whole collections; partial data is never returned,
//! so store errors propagate to the caller.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{sort_most_recent_first, DailyLog, Outfit, WardrobeItem};
use crate::ports::{decode_all, Collection, CollectionPath, DocumentStore, Filter};

/// Cap applied to every ranked list in `UsageMetrics`
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub total_days: usize,
    pub last_log_date: Option<NaiveDate>,
    pub streak: u32,
    pub total_outfits: usize,
    pub total_items: usize,
}

/// An entity paired with its average rating
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rated<T> {
    #[serde(flatten)]
    pub entity: T,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitMetrics {
    pub most_worn_outfits: Vec<Outfit>,
    pub top_rated_outfits: Vec<Rated<Outfit>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeMetrics {
    pub most_worn_items: Vec<WardrobeItem>,
    pub least_worn_items: Vec<WardrobeItem>,
    pub top_rated_items: Vec<Rated<WardrobeItem>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    pub summary: UsageSummary,
    pub outfits: OutfitMetrics,
    pub wardrobe: WardrobeMetrics,
    /// All logs, most recent first
    pub daily_logs: Vec<DailyLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub total_wears: usize,
    pub average_rating: f64,
    pub occasions: Vec<String>,
    pub last_worn: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitStats {
    pub total_wears: usize,
    pub average_rating: f64,
    pub occasions: Vec<String>,
    pub last_worn: Option<NaiveDate>,
    pub wear_history: Vec<DailyLog>,
}

pub struct StatsService {
    store: Arc<dyn DocumentStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_usage_metrics(&self, user_id: &str) -> Result<UsageMetrics> {
        self.get_usage_metrics_on(user_id, Utc::now().date_naive()).await
    }

    /// Usage metrics with the streak counted back from `today`
    pub async fn get_usage_metrics_on(&self, user_id: &str, today: NaiveDate) -> Result<UsageMetrics> {
        let logs_path = CollectionPath::new(user_id, Collection::DailyLogs);
        let outfits_path = CollectionPath::new(user_id, Collection::Outfits);
        let items_path = CollectionPath::new(user_id, Collection::Wardrobe);

        let (log_docs, outfit_docs, item_docs) = tokio::try_join!(
            self.store.list(&logs_path),
            self.store.list(&outfits_path),
            self.store.list(&items_path),
        )?;

        let mut logs: Vec<DailyLog> = decode_all(&log_docs)?;
        let outfits: Vec<Outfit> = decode_all(&outfit_docs)?;
        let items: Vec<WardrobeItem> = decode_all(&item_docs)?;
        sort_most_recent_first(&mut logs);

        let summary = UsageSummary {
            total_days: logs.len(),
            last_log_date: logs.iter().map(|l| l.date).max(),
            streak: compute_streak(&logs, today),
            total_outfits: outfits.len(),
            total_items: items.len(),
        };

        tracing::debug!(
            user_id,
            logs = logs.len(),
            outfits = outfits.len(),
            items = items.len(),
            "Computed usage metrics"
        );

        Ok(UsageMetrics {
            summary,
            outfits: OutfitMetrics {
                most_worn_outfits: most_worn(&outfits, |o| o.wear_count),
                top_rated_outfits: top_rated(&outfits, Outfit::average_rating),
            },
            wardrobe: WardrobeMetrics {
                most_worn_items: most_worn(&items, |i| i.wear_count),
                least_worn_items: items
                    .iter()
                    .filter(|i| i.wear_count == 0)
                    .take(TOP_N)
                    .cloned()
                    .collect(),
                top_rated_items: top_rated(&items, WardrobeItem::average_rating),
            },
            daily_logs: logs,
        })
    }

    /// Statistics over the logs that include `item_id`
    pub async fn get_item_stats(&self, user_id: &str, item_id: &str) -> Result<ItemStats> {
        let logs_path = CollectionPath::new(user_id, Collection::DailyLogs);
        let docs = self
            .store
            .query(&logs_path, &Filter::array_contains("items", item_id))
            .await?;
        let mut matches: Vec<DailyLog> = decode_all(&docs)?;
        sort_most_recent_first(&mut matches);

        Ok(ItemStats {
            total_wears: matches.len(),
            average_rating: mean_rating(&matches),
            occasions: distinct_occasions(&matches),
            last_worn: matches.first().map(|l| l.date),
        })
    }

    /// Statistics over the logs of `outfit_id`, with the matching logs attached
    pub async fn get_outfit_stats(&self, user_id: &str, outfit_id: &str) -> Result<OutfitStats> {
        let logs_path = CollectionPath::new(user_id, Collection::DailyLogs);
        let docs = self
            .store
            .query(&logs_path, &Filter::equals("outfitId", outfit_id))
            .await?;
        let mut matches: Vec<DailyLog> = decode_all(&docs)?;
        sort_most_recent_first(&mut matches);

        Ok(OutfitStats {
            total_wears: matches.len(),
            average_rating: mean_rating(&matches),
            occasions: distinct_occasions(&matches),
            last_worn: matches.first().map(|l| l.date),
            wear_history: matches,
        })
    }
}

/// Consecutive logged days counting back from `today`; 0 if today has no log
pub fn compute_streak(logs: &[DailyLog], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = logs.iter().map(|l| l.date).collect();
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(d) = day.filter(|d| dates.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

fn most_worn<T: Clone>(entities: &[T], wear_count: impl Fn(&T) -> u32) -> Vec<T> {
    let mut sorted: Vec<&T> = entities.iter().collect();
    sorted.sort_by(|a, b| wear_count(b).cmp(&wear_count(a)));
    sorted.into_iter().take(TOP_N).cloned().collect()
}

fn top_rated<T: Clone>(entities: &[T], average: impl Fn(&T) -> Option<f64>) -> Vec<Rated<T>> {
    let mut rated: Vec<Rated<T>> = entities
        .iter()
        .filter_map(|e| {
            average(e).map(|average_rating| Rated {
                entity: e.clone(),
                average_rating,
            })
        })
        .collect();
    rated.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(Ordering::Equal)
    });
    rated.truncate(TOP_N);
    rated
}

/// Mean rating to one decimal place, 0 for no logs
fn mean_rating(logs: &[DailyLog]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let total: u32 = logs.iter().map(|l| l.rating as u32).sum();
    let mean = total as f64 / logs.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn distinct_occasions(logs: &[DailyLog]) -> Vec<String> {
    let mut seen = HashSet::new();
    logs.iter()
        .filter_map(|l| l.occasion.as_deref())
        .filter(|o| !o.is_empty())
        .filter(|o| seen.insert(o.to_string()))
        .map(String::from)
        .collect()
}
