//! Output formatting utilities

use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;
use wardrobe_core::OperationResult;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Pretty-print a value as JSON, wrapped in a success envelope
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&OperationResult::ok(value))?);
    Ok(())
}

/// Print a failure envelope on stdout, falling back to stderr
pub fn print_json_error(msg: &str) {
    match serde_json::to_string_pretty(&OperationResult::<()>::fail(msg)) {
        Ok(body) => println!("{}", body),
        Err(_) => error(msg),
    }
}

/// Star rating, or a dash when unrated
pub fn format_rating(rating: u8) -> String {
    if rating == 0 {
        "-".to_string()
    } else {
        "★".repeat(rating as usize)
    }
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}", avg),
        None => "-".to_string(),
    }
}

pub fn format_day(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "never".to_string())
}

pub fn format_last_worn(ts: Option<DateTime<Utc>>) -> String {
    format_day(ts.map(|t| t.date_naive()))
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
