//! Integration tests for wardrobe-core services
//!
//! These run the wear logger, aggregator and stat queries end to end over
//! the in-memory document store.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use wardrobe_core::adapters::memory::MemoryDocumentStore;
use wardrobe_core::config::Config;
use wardrobe_core::domain::{Category, DailyLog, Outfit, WardrobeItem};
use wardrobe_core::ports::{Collection, CollectionPath, DocumentStore, DocumentWrite};
use wardrobe_core::services::{DailyLogUpdate, LogRequest, NewOutfit, TOP_N};
use wardrobe_core::WardrobeContext;

const USER: &str = "user-1";

// ============================================================================
// Test Helpers
// ============================================================================

fn create_context() -> (Arc<MemoryDocumentStore>, WardrobeContext) {
    wardrobe_core::logging::init_test();
    let store = Arc::new(MemoryDocumentStore::new());
    let ctx = WardrobeContext::with_stores(store.clone(), None, Config::default());
    (store, ctx)
}

/// Seed an item under a known id
fn seed_item(store: &MemoryDocumentStore, id: &str, name: &str) {
    let item = WardrobeItem::new(name, Category::Tops);
    let write = DocumentWrite::from_object(&item).unwrap();
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::Wardrobe), id, &write)
        .unwrap();
}

/// Seed an outfit under a known id
fn seed_outfit(store: &MemoryDocumentStore, id: &str, items: &[&str]) {
    let outfit = Outfit::new(id, items.iter().map(|s| s.to_string()).collect());
    let write = DocumentWrite::from_object(&outfit).unwrap();
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::Outfits), id, &write)
        .unwrap();
}

async fn get_item(ctx: &WardrobeContext, id: &str) -> WardrobeItem {
    ctx.wardrobe_service
        .get_wardrobe_item(USER, id)
        .await
        .unwrap()
        .expect("item should exist")
}

async fn get_outfit(ctx: &WardrobeContext, id: &str) -> Outfit {
    ctx.outfit_service
        .get_outfit(USER, id)
        .await
        .unwrap()
        .expect("outfit should exist")
}

async fn get_log(ctx: &WardrobeContext, id: &str) -> DailyLog {
    let path = CollectionPath::new(USER, Collection::DailyLogs).doc(id);
    ctx.store.get(&path).await.unwrap().unwrap().decode().unwrap()
}

fn at(date: &str, hour: u32) -> chrono::DateTime<Utc> {
    let d: NaiveDate = date.parse().unwrap();
    Utc.from_utc_datetime(&d.and_hms_opt(hour, 0, 0).unwrap())
}

// ============================================================================
// Wear logging
// ============================================================================

#[tokio::test]
async fn test_logging_updates_outfit_and_item_counters() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Oxford shirt");
    seed_item(&store, "I2", "Chinos");
    seed_outfit(&store, "O1", &["I1", "I2"]);

    let now = at("2024-06-01", 9);
    let log_id = ctx
        .usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O1").with_rating(4), now)
        .await
        .unwrap();

    let outfit = get_outfit(&ctx, "O1").await;
    assert_eq!(outfit.wear_count, 1);
    assert_eq!(outfit.total_rating, 4);
    assert!(outfit.last_worn.is_some());

    for id in ["I1", "I2"] {
        let item = get_item(&ctx, id).await;
        assert_eq!(item.wear_count, 1, "{id} wear count");
        assert_eq!(item.total_rating, 4, "{id} total rating");
        assert_eq!(item.usage_history.len(), 1);
        assert_eq!(item.usage_history[0].log_id, log_id);
        assert_eq!(item.usage_history[0].outfit_id, "O1");
    }

    let log = get_log(&ctx, &log_id).await;
    assert_eq!(log.outfit_id, "O1");
    assert_eq!(log.rating, 4);
    assert_eq!(log.items, vec!["I1", "I2"]);
    assert_eq!(log.date, now.date_naive());
    assert!(log.timestamp.is_some());
    assert_eq!(store.count(&CollectionPath::new(USER, Collection::DailyLogs)), 1);
}

#[tokio::test]
async fn test_log_round_trips_rating_notes_and_photos() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Jacket");
    seed_outfit(&store, "O1", &["I1"]);

    let photos = vec!["https://photos/a.jpg".to_string(), "https://photos/b.jpg".to_string()];
    let log_id = ctx
        .usage_service
        .log_daily_outfit(
            USER,
            LogRequest::new("O1")
                .with_rating(3)
                .with_notes("Rainy, stayed dry")
                .with_photos(photos.clone())
                .with_occasion("work"),
        )
        .await
        .unwrap();

    let log = get_log(&ctx, &log_id).await;
    assert_eq!(log.rating, 3);
    assert_eq!(log.notes, "Rainy, stayed dry");
    assert_eq!(log.photos, photos);
    assert_eq!(log.occasion.as_deref(), Some("work"));
}

#[tokio::test]
async fn test_log_defaults_when_fields_omitted() {
    let (store, ctx) = create_context();
    seed_outfit(&store, "O1", &["I1"]);
    seed_item(&store, "I1", "Tee");

    let log_id = ctx
        .usage_service
        .log_daily_outfit(USER, LogRequest::new("O1"))
        .await
        .unwrap();
    let log = get_log(&ctx, &log_id).await;
    assert_eq!(log.rating, 0);
    assert!(log.notes.is_empty());
    assert!(log.photos.is_empty());
    assert!(log.occasion.is_none());
}

#[tokio::test]
async fn test_dangling_outfit_keeps_log_and_leaves_counters() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Scarf");
    seed_outfit(&store, "O1", &["I1"]);

    let log_id = ctx
        .usage_service
        .log_daily_outfit(USER, LogRequest::new("nonexistent").with_rating(5))
        .await
        .unwrap();
    assert!(!log_id.is_empty());

    let log = get_log(&ctx, &log_id).await;
    assert_eq!(log.outfit_id, "nonexistent");
    assert!(log.items.is_empty());

    assert_eq!(get_outfit(&ctx, "O1").await.wear_count, 0);
    let item = get_item(&ctx, "I1").await;
    assert_eq!(item.wear_count, 0);
    assert_eq!(item.total_rating, 0);
    assert!(item.usage_history.is_empty());
}

#[tokio::test]
async fn test_rating_out_of_range_writes_nothing() {
    let (store, ctx) = create_context();
    seed_outfit(&store, "O1", &["I1"]);

    let err = ctx
        .usage_service
        .log_daily_outfit(USER, LogRequest::new("O1").with_rating(6))
        .await
        .unwrap_err();
    assert!(matches!(err, wardrobe_core::Error::Validation(_)));
    assert_eq!(store.count(&CollectionPath::new(USER, Collection::DailyLogs)), 0);
}

#[tokio::test]
async fn test_legacy_object_items_are_normalized() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Boots");
    seed_item(&store, "I2", "Coat");
    let write = DocumentWrite::new()
        .set("name", "Winter")
        .set(
            "items",
            serde_json::json!([{ "id": "I1" }, "I2", { "id": "I1" }]),
        );
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::Outfits), "O1", &write)
        .unwrap();

    ctx.usage_service
        .log_daily_outfit(USER, LogRequest::new("O1").with_rating(2))
        .await
        .unwrap();

    assert_eq!(get_item(&ctx, "I1").await.wear_count, 1);
    assert_eq!(get_item(&ctx, "I2").await.wear_count, 1);
    assert_eq!(get_outfit(&ctx, "O1").await.wear_count, 1);
}

#[tokio::test]
async fn test_outfit_missing_fields_still_counts_wears() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Scarf");
    // No name, object-shaped member refs
    let write = DocumentWrite::new().set("items", serde_json::json!([{ "id": "I1" }]));
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::Outfits), "O1", &write)
        .unwrap();

    ctx.usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O1").with_rating(4), at("2024-06-01", 9))
        .await
        .unwrap();

    let outfit = get_outfit(&ctx, "O1").await;
    assert_eq!(outfit.wear_count, 1);
    assert_eq!(outfit.total_rating, 4);
    let item = get_item(&ctx, "I1").await;
    assert_eq!(item.wear_count, 1);
    assert_eq!(item.total_rating, 4);

    // A hand-written log with a fractional rating
    let legacy = DocumentWrite::new()
        .set("date", "2024-06-02")
        .set("outfitId", "O1")
        .set("rating", 4.5);
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::DailyLogs), "L-legacy", &legacy)
        .unwrap();

    let metrics = ctx
        .stats_service
        .get_usage_metrics_on(USER, "2024-06-02".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(metrics.summary.total_days, 2);
    assert_eq!(metrics.summary.total_outfits, 1);
    assert_eq!(metrics.summary.total_items, 1);
    assert_eq!(get_log(&ctx, "L-legacy").await.rating, 5);
}

#[tokio::test]
async fn test_undecodable_log_fails_reads_instead_of_shrinking_them() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Tee");
    seed_outfit(&store, "O1", &["I1"]);
    ctx.usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O1"), at("2024-06-01", 9))
        .await
        .unwrap();

    let broken = DocumentWrite::new().set("date", "last tuesday").set("outfitId", "O1");
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::DailyLogs), "L-bad", &broken)
        .unwrap();

    let err = ctx.stats_service.get_usage_metrics(USER).await.unwrap_err();
    assert!(err.to_string().contains("L-bad"));
    assert!(ctx.usage_service.get_daily_logs(USER, None).await.is_err());
}

#[tokio::test]
async fn test_float_counters_keep_counting() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Raincoat");
    let write = DocumentWrite::new()
        .set("name", "Stormy")
        .set("items", vec!["I1"])
        .set("wearCount", 2.0)
        .set("totalRating", 7.0);
    store
        .insert_with_id(&CollectionPath::new(USER, Collection::Outfits), "O2", &write)
        .unwrap();

    ctx.usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O2").with_rating(3), at("2024-06-01", 9))
        .await
        .unwrap();

    let outfit = get_outfit(&ctx, "O2").await;
    assert_eq!(outfit.wear_count, 3);
    assert_eq!(outfit.total_rating, 10);
}

#[tokio::test]
async fn test_same_day_logs_are_not_merged() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Hoodie");
    seed_outfit(&store, "O1", &["I1"]);

    let now = at("2024-06-01", 9);
    for rating in [2, 4] {
        ctx.usage_service
            .log_daily_outfit_at(USER, LogRequest::new("O1").with_rating(rating), now)
            .await
            .unwrap();
    }

    let outfit = get_outfit(&ctx, "O1").await;
    assert_eq!(outfit.wear_count, 2);
    assert_eq!(outfit.total_rating, 6);

    let metrics = ctx
        .stats_service
        .get_usage_metrics_on(USER, "2024-06-01".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(metrics.summary.total_days, 2);
    assert_eq!(metrics.summary.streak, 1);
}

// ============================================================================
// Daily log reads and edits
// ============================================================================

#[tokio::test]
async fn test_daily_logs_most_recent_first_and_limited() {
    let (store, ctx) = create_context();
    seed_outfit(&store, "O1", &["I1"]);

    let mut ids = Vec::new();
    for day in 1..=5 {
        let id = ctx
            .usage_service
            .log_daily_outfit_at(USER, LogRequest::new("O1"), at(&format!("2024-03-0{day}"), 8))
            .await
            .unwrap();
        ids.push(id);
    }

    let logs = ctx.usage_service.get_daily_logs(USER, Some(3)).await.unwrap();
    let got: Vec<_> = logs.iter().map(|l| l.id.clone()).collect();
    assert_eq!(got, vec![ids[4].clone(), ids[3].clone(), ids[2].clone()]);

    let all = ctx.usage_service.get_daily_logs(USER, None).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_today_outfit_joins_the_outfit() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Polo");
    seed_outfit(&store, "O1", &["I1"]);

    assert!(ctx.usage_service.get_today_outfit(USER).await.unwrap().is_none());

    let log_id = ctx
        .usage_service
        .log_daily_outfit(USER, LogRequest::new("O1").with_rating(5))
        .await
        .unwrap();
    let today = ctx.usage_service.get_today_outfit(USER).await.unwrap().unwrap();
    assert_eq!(today.log.id, log_id);
    assert_eq!(today.outfit.unwrap().id, "O1");
}

#[tokio::test]
async fn test_outfit_worn_on_picks_latest_log_of_the_day() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Cardigan");
    seed_outfit(&store, "O1", &["I1"]);

    ctx.usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O1").with_rating(2), at("2024-05-01", 8))
        .await
        .unwrap();
    let later = ctx
        .usage_service
        .log_daily_outfit_at(USER, LogRequest::new("gone").with_rating(4), at("2024-05-01", 19))
        .await
        .unwrap();

    let day: NaiveDate = "2024-05-01".parse().unwrap();
    let worn = ctx.usage_service.get_outfit_worn_on(USER, day).await.unwrap().unwrap();
    assert_eq!(worn.log.id, later);
    assert!(worn.outfit.is_none(), "dangling outfit joins as None");

    let next_day = day + Duration::days(1);
    assert!(ctx.usage_service.get_outfit_worn_on(USER, next_day).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_daily_log_leaves_counters_for_reconcile() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Dress");
    seed_outfit(&store, "O1", &["I1"]);

    let log_id = ctx
        .usage_service
        .log_daily_outfit(USER, LogRequest::new("O1").with_rating(2))
        .await
        .unwrap();
    ctx.usage_service
        .update_daily_log(
            USER,
            &log_id,
            DailyLogUpdate {
                rating: Some(5),
                notes: Some("Changed my mind".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let log = get_log(&ctx, &log_id).await;
    assert_eq!(log.rating, 5);
    assert_eq!(log.notes, "Changed my mind");
    assert!(log.updated_at.is_some());
    assert_eq!(get_outfit(&ctx, "O1").await.total_rating, 2);

    let report = ctx.reconcile_service.reconcile_counters(USER).await.unwrap();
    assert_eq!(report.outfits_updated, 1);
    assert_eq!(report.items_updated, 1);
    assert_eq!(get_outfit(&ctx, "O1").await.total_rating, 5);
    assert_eq!(get_item(&ctx, "I1").await.total_rating, 5);

    let again = ctx.reconcile_service.reconcile_counters(USER).await.unwrap();
    assert_eq!(again.outfits_updated + again.items_updated, 0);
}

#[tokio::test]
async fn test_reconcile_keeps_item_wears_after_outfit_deleted() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Trench");
    seed_outfit(&store, "O1", &["I1"]);

    ctx.usage_service
        .log_daily_outfit_at(USER, LogRequest::new("O1").with_rating(4), at("2024-06-01", 9))
        .await
        .unwrap();
    ctx.outfit_service.delete_outfit(USER, "O1").await.unwrap();

    let report = ctx.reconcile_service.reconcile_counters(USER).await.unwrap();
    assert_eq!(report.dangling_logs, 1);
    assert_eq!(report.items_updated, 0);

    let item = get_item(&ctx, "I1").await;
    let stats = ctx.stats_service.get_item_stats(USER, "I1").await.unwrap();
    assert_eq!(item.wear_count, 1);
    assert_eq!(item.total_rating, 4);
    assert_eq!(item.wear_count as usize, stats.total_wears);
}

#[tokio::test]
async fn test_update_missing_log_is_not_found() {
    let (_, ctx) = create_context();
    let err = ctx
        .usage_service
        .update_daily_log(USER, "missing", DailyLogUpdate::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Usage metrics
// ============================================================================

#[tokio::test]
async fn test_streak_counts_consecutive_days_from_today() {
    let (store, ctx) = create_context();
    seed_outfit(&store, "O1", &["I1"]);
    let today: NaiveDate = "2024-04-10".parse().unwrap();

    for back in [0, 1, 2, 4, 5] {
        let day = today - Duration::days(back);
        let now = Utc.from_utc_datetime(&day.and_hms_opt(7, 30, 0).unwrap());
        ctx.usage_service
            .log_daily_outfit_at(USER, LogRequest::new("O1"), now)
            .await
            .unwrap();
    }

    let metrics = ctx.stats_service.get_usage_metrics_on(USER, today).await.unwrap();
    assert_eq!(metrics.summary.streak, 3);
    assert_eq!(metrics.summary.total_days, 5);
    assert_eq!(metrics.summary.last_log_date, Some(today));

    let tomorrow = today + Duration::days(1);
    let metrics = ctx.stats_service.get_usage_metrics_on(USER, tomorrow).await.unwrap();
    assert_eq!(metrics.summary.streak, 0);
}

#[tokio::test]
async fn test_rankings_are_capped() {
    let (store, ctx) = create_context();
    let wardrobe = CollectionPath::new(USER, Collection::Wardrobe);
    let outfits = CollectionPath::new(USER, Collection::Outfits);

    for n in 0..8u32 {
        let mut outfit = Outfit::new(format!("Outfit {n}"), vec![format!("worn-{n}")]);
        outfit.wear_count = n + 1;
        outfit.total_rating = (n + 1) * 3;
        store
            .insert_with_id(&outfits, &format!("O{n}"), &DocumentWrite::from_object(&outfit).unwrap())
            .unwrap();

        let mut worn = WardrobeItem::new(format!("Worn {n}"), Category::Tops);
        worn.wear_count = n + 1;
        worn.total_rating = n + 1;
        store
            .insert_with_id(&wardrobe, &format!("worn-{n}"), &DocumentWrite::from_object(&worn).unwrap())
            .unwrap();

        let unworn = WardrobeItem::new(format!("Unworn {n}"), Category::Accessories);
        store
            .insert_with_id(&wardrobe, &format!("unworn-{n}"), &DocumentWrite::from_object(&unworn).unwrap())
            .unwrap();
    }

    let metrics = ctx.stats_service.get_usage_metrics(USER).await.unwrap();
    assert_eq!(metrics.outfits.most_worn_outfits.len(), TOP_N);
    assert_eq!(metrics.outfits.top_rated_outfits.len(), TOP_N);
    assert_eq!(metrics.wardrobe.most_worn_items.len(), TOP_N);
    assert_eq!(metrics.wardrobe.top_rated_items.len(), TOP_N);
    assert_eq!(metrics.wardrobe.least_worn_items.len(), TOP_N);

    assert_eq!(metrics.outfits.most_worn_outfits[0].wear_count, 8);
    assert!(metrics.wardrobe.least_worn_items.iter().all(|i| i.wear_count == 0));
    assert!(metrics
        .wardrobe
        .top_rated_items
        .iter()
        .all(|r| r.entity.wear_count > 0 && r.average_rating == 1.0));
    assert_eq!(metrics.summary.total_items, 16);
    assert_eq!(metrics.summary.total_outfits, 8);
    assert_eq!(metrics.summary.total_days, 0);
    assert_eq!(metrics.summary.last_log_date, None);
}

#[tokio::test]
async fn test_top_rated_ties_keep_store_order() {
    let (store, ctx) = create_context();
    let outfits = CollectionPath::new(USER, Collection::Outfits);
    for id in ["first", "second", "third"] {
        let mut outfit = Outfit::new(id, vec!["I1".into()]);
        outfit.wear_count = 2;
        outfit.total_rating = 8;
        store
            .insert_with_id(&outfits, id, &DocumentWrite::from_object(&outfit).unwrap())
            .unwrap();
    }

    let metrics = ctx.stats_service.get_usage_metrics(USER).await.unwrap();
    let names: Vec<_> = metrics
        .outfits
        .top_rated_outfits
        .iter()
        .map(|r| r.entity.id.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
    assert_eq!(metrics.outfits.top_rated_outfits[0].average_rating, 4.0);
}

// ============================================================================
// Item / outfit stats
// ============================================================================

#[tokio::test]
async fn test_item_stats_average_rating() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Sneakers");
    seed_outfit(&store, "O1", &["I1"]);

    for (day, rating) in [(1, 5), (2, 5), (3, 4), (4, 4)] {
        ctx.usage_service
            .log_daily_outfit_at(
                USER,
                LogRequest::new("O1").with_rating(rating),
                at(&format!("2024-02-0{day}"), 12),
            )
            .await
            .unwrap();
    }

    let item = get_item(&ctx, "I1").await;
    assert_eq!(item.wear_count, 4);
    assert_eq!(item.total_rating, 18);
    assert_eq!(item.average_rating(), Some(4.5));

    let stats = ctx.stats_service.get_item_stats(USER, "I1").await.unwrap();
    assert_eq!(stats.total_wears, 4);
    assert_eq!(stats.average_rating, 4.5);
    assert_eq!(stats.last_worn, Some("2024-02-04".parse().unwrap()));
}

#[tokio::test]
async fn test_item_stats_empty_for_unworn_item() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Tie");

    let stats = ctx.stats_service.get_item_stats(USER, "I1").await.unwrap();
    assert_eq!(stats.total_wears, 0);
    assert_eq!(stats.average_rating, 0.0);
    assert!(stats.occasions.is_empty());
    assert_eq!(stats.last_worn, None);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "totalWears": 0, "averageRating": 0.0, "occasions": [], "lastWorn": null })
    );
}

#[tokio::test]
async fn test_outfit_stats_with_history_and_occasions() {
    let (store, ctx) = create_context();
    seed_item(&store, "I1", "Blazer");
    seed_outfit(&store, "O1", &["I1"]);
    seed_outfit(&store, "O2", &["I1"]);

    let logs = [
        ("O1", "2024-05-01", 3, "work"),
        ("O2", "2024-05-02", 5, "party"),
        ("O1", "2024-05-03", 4, "dinner"),
        ("O1", "2024-05-04", 4, "work"),
    ];
    for (outfit, date, rating, occasion) in logs {
        ctx.usage_service
            .log_daily_outfit_at(
                USER,
                LogRequest::new(outfit).with_rating(rating).with_occasion(occasion),
                at(date, 18),
            )
            .await
            .unwrap();
    }

    let stats = ctx.stats_service.get_outfit_stats(USER, "O1").await.unwrap();
    assert_eq!(stats.total_wears, 3);
    assert_eq!(stats.average_rating, 3.7);
    assert_eq!(stats.occasions, vec!["work", "dinner"]);
    assert_eq!(stats.last_worn, Some("2024-05-04".parse().unwrap()));
    assert_eq!(stats.wear_history.len(), 3);
    assert_eq!(stats.wear_history[0].date, "2024-05-04".parse::<NaiveDate>().unwrap());

    let item_stats = ctx.stats_service.get_item_stats(USER, "I1").await.unwrap();
    assert_eq!(item_stats.total_wears, 4);
    assert_eq!(item_stats.occasions, vec!["work", "dinner", "party"]);
}

// ============================================================================
// CRUD through the context
// ============================================================================

#[tokio::test]
async fn test_wardrobe_to_outfit_to_log_flow() {
    let (_, ctx) = create_context();

    let mut coat = WardrobeItem::new("Wool coat", Category::Outerwear);
    coat.price = Some(Decimal::new(24000, 2));
    coat.image = Some("https://img/coat.jpg".into());
    let coat_id = ctx.wardrobe_service.add_wardrobe_item(USER, coat).await.unwrap();
    let boots_id = ctx
        .wardrobe_service
        .add_wardrobe_item(USER, WardrobeItem::new("Boots", Category::Shoes))
        .await
        .unwrap();

    let outfit_id = ctx
        .outfit_service
        .create_outfit(
            USER,
            NewOutfit {
                name: "Winter commute".into(),
                items: vec![coat_id.clone(), boots_id.clone()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(get_outfit(&ctx, &outfit_id).await.preview_images, vec!["https://img/coat.jpg"]);

    for day in 1..=3 {
        ctx.usage_service
            .log_daily_outfit_at(
                USER,
                LogRequest::new(outfit_id.clone()).with_rating(4),
                at(&format!("2024-01-0{day}"), 8),
            )
            .await
            .unwrap();
    }

    let coat = get_item(&ctx, &coat_id).await;
    assert_eq!(coat.wear_count, 3);
    assert_eq!(coat.cost_per_wear(), Some(Decimal::new(8000, 2)));

    // Deleting an item leaves outfits and logs untouched
    ctx.wardrobe_service.delete_wardrobe_item(USER, &boots_id).await.unwrap();
    assert_eq!(get_outfit(&ctx, &outfit_id).await.items.len(), 2);
    assert_eq!(
        ctx.stats_service.get_item_stats(USER, &boots_id).await.unwrap().total_wears,
        3
    );
}
