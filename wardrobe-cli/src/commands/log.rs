//! Log commands - record today's outfit and browse the history

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use wardrobe_core::services::LogRequest;

use super::Session;
use crate::output::{self, create_table, format_rating, or_dash};

pub struct LogArgs {
    pub outfit_id: String,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub occasion: Option<String>,
    pub photo: Option<PathBuf>,
    pub photo_urls: Vec<String>,
    pub json: bool,
}

/// Log today's outfit
pub async fn run(session: Session, args: LogArgs) -> Result<()> {
    let mut request = LogRequest::new(args.outfit_id.clone()).with_photos(args.photo_urls);
    if let Some(rating) = args.rating {
        request = request.with_rating(rating);
    }
    if let Some(notes) = args.notes {
        request = request.with_notes(notes);
    }
    if let Some(occasion) = args.occasion {
        request = request.with_occasion(occasion);
    }
    if let Some(path) = &args.photo {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read photo {}", path.display()))?;
        request = request.with_photo_upload(bytes);
    }

    let log_id = session
        .ctx
        .usage_service
        .log_daily_outfit(&session.user_id, request)
        .await?;

    if args.json {
        return output::print_json(&serde_json::json!({ "id": log_id }));
    }
    output::success(&format!("Logged outfit {} for today ({})", args.outfit_id, log_id));
    Ok(())
}

/// Show the outfit logged today, or on `date`
pub async fn run_today(session: Session, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let usage = &session.ctx.usage_service;
    let today = match date {
        Some(date) => usage.get_outfit_worn_on(&session.user_id, date).await?,
        None => usage.get_today_outfit(&session.user_id).await?,
    };

    if json {
        return output::print_json(&today);
    }
    let Some(today) = today else {
        match date {
            Some(date) => output::info(&format!("Nothing logged on {}.", date)),
            None => output::info("Nothing logged today. Use `wd log <outfit-id>`."),
        }
        return Ok(());
    };

    match &today.outfit {
        Some(outfit) => println!("{}: {}", today.log.date, outfit.name.bold()),
        None => output::warning(&format!("Outfit {} no longer exists", today.log.outfit_id)),
    }
    println!("Rating: {}", format_rating(today.log.rating));
    if !today.log.notes.is_empty() {
        println!("Notes: {}", today.log.notes);
    }
    if let Some(occasion) = &today.log.occasion {
        println!("Occasion: {}", occasion);
    }
    for photo in &today.log.photos {
        println!("Photo: {}", photo);
    }
    Ok(())
}

/// Show recent daily logs
pub async fn run_history(session: Session, limit: Option<usize>, json: bool) -> Result<()> {
    let logs = session
        .ctx
        .usage_service
        .get_daily_logs(&session.user_id, limit)
        .await?;

    if json {
        return output::print_json(&logs);
    }
    if logs.is_empty() {
        output::info("No daily logs yet.");
        return Ok(());
    }

    let outfits = session.ctx.outfit_service.get_outfits(&session.user_id).await?;
    let mut table = create_table();
    table.set_header(vec!["Date", "Outfit", "Rating", "Occasion", "Notes"]);
    for log in &logs {
        let outfit_name = outfits
            .iter()
            .find(|o| o.id == log.outfit_id)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| format!("{} (missing)", log.outfit_id));
        table.add_row(vec![
            log.date.to_string(),
            outfit_name,
            format_rating(log.rating),
            or_dash(log.occasion.as_deref()).to_string(),
            log.notes.clone(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Amend an existing log; wear counters follow on the next `wd reconcile`
pub async fn run_edit(session: Session, log_id: &str, update: wardrobe_core::services::DailyLogUpdate) -> Result<()> {
    session
        .ctx
        .usage_service
        .update_daily_log(&session.user_id, log_id, update)
        .await?;
    output::success(&format!("Updated log {}", log_id));
    output::info("Run `wd reconcile` to refresh wear counters after changing a rating.");
    Ok(())
}
