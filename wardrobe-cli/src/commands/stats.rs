//! Stats commands - usage dashboard and per-entity statistics

use anyhow::Result;
use colored::Colorize;
use comfy_table::Table;
use wardrobe_core::services::{ItemStats, OutfitStats};

use super::Session;
use crate::output::{self, create_table, format_day};

pub async fn run(session: Session, json: bool) -> Result<()> {
    let metrics = session
        .ctx
        .stats_service
        .get_usage_metrics(&session.user_id)
        .await?;

    if json {
        return output::print_json(&metrics);
    }

    let summary = &metrics.summary;
    println!("{}", "Wardrobe Usage".bold());
    println!();
    let mut table = create_table();
    table.add_row(vec!["Days logged".to_string(), summary.total_days.to_string()]);
    table.add_row(vec!["Current streak".to_string(), format!("{} day(s)", summary.streak)]);
    table.add_row(vec!["Last log".to_string(), format_day(summary.last_log_date)]);
    table.add_row(vec!["Outfits".to_string(), summary.total_outfits.to_string()]);
    table.add_row(vec!["Items".to_string(), summary.total_items.to_string()]);
    println!("{}", table);

    print_ranking(
        "Most worn outfits",
        metrics
            .outfits
            .most_worn_outfits
            .iter()
            .map(|o| (o.name.clone(), o.wear_count.to_string())),
    );
    print_ranking(
        "Top rated outfits",
        metrics
            .outfits
            .top_rated_outfits
            .iter()
            .map(|r| (r.entity.name.clone(), format!("{:.1}", r.average_rating))),
    );
    print_ranking(
        "Most worn items",
        metrics
            .wardrobe
            .most_worn_items
            .iter()
            .map(|i| (i.name.clone(), i.wear_count.to_string())),
    );
    print_ranking(
        "Top rated items",
        metrics
            .wardrobe
            .top_rated_items
            .iter()
            .map(|r| (r.entity.name.clone(), format!("{:.1}", r.average_rating))),
    );
    print_ranking(
        "Never worn",
        metrics
            .wardrobe
            .least_worn_items
            .iter()
            .map(|i| (i.name.clone(), i.category.to_string())),
    );
    Ok(())
}

fn print_ranking(title: &str, rows: impl Iterator<Item = (String, String)>) {
    let mut table = Table::new();
    let mut empty = true;
    for (name, value) in rows {
        table.add_row(vec![name, value]);
        empty = false;
    }
    if empty {
        return;
    }
    println!();
    println!("{}", title.bold());
    println!("{}", table);
}

fn stats_table(total_wears: usize, average_rating: f64, occasions: &[String], last_worn: Option<chrono::NaiveDate>) -> Table {
    let mut table = create_table();
    table.add_row(vec!["Total wears".to_string(), total_wears.to_string()]);
    table.add_row(vec!["Average rating".to_string(), format!("{:.1}", average_rating)]);
    table.add_row(vec!["Occasions".to_string(), occasions.join(", ")]);
    table.add_row(vec!["Last worn".to_string(), format_day(last_worn)]);
    table
}

pub async fn run_item(session: Session, item_id: &str, json: bool) -> Result<()> {
    let stats: ItemStats = session
        .ctx
        .stats_service
        .get_item_stats(&session.user_id, item_id)
        .await?;

    if json {
        return output::print_json(&stats);
    }
    println!("{}", format!("Item {}", item_id).bold());
    println!(
        "{}",
        stats_table(stats.total_wears, stats.average_rating, &stats.occasions, stats.last_worn)
    );
    Ok(())
}

pub async fn run_outfit(session: Session, outfit_id: &str, json: bool) -> Result<()> {
    let stats: OutfitStats = session
        .ctx
        .stats_service
        .get_outfit_stats(&session.user_id, outfit_id)
        .await?;

    if json {
        return output::print_json(&stats);
    }
    println!("{}", format!("Outfit {}", outfit_id).bold());
    println!(
        "{}",
        stats_table(stats.total_wears, stats.average_rating, &stats.occasions, stats.last_worn)
    );

    if !stats.wear_history.is_empty() {
        println!();
        println!("{}", "Wear history".bold());
        for log in &stats.wear_history {
            println!("  {}  {}", log.date, output::format_rating(log.rating));
        }
    }
    Ok(())
}
