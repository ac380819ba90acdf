//! Reconcile command - rebuild cached wear counters from the daily logs

use anyhow::Result;
use colored::Colorize;

use super::Session;
use crate::output;

pub async fn run(session: Session, json: bool) -> Result<()> {
    let report = session
        .ctx
        .reconcile_service
        .reconcile_counters(&session.user_id)
        .await?;

    if json {
        return output::print_json(&report);
    }

    println!("Scanned {} daily log(s)", report.logs_scanned);
    if report.outfits_updated + report.items_updated == 0 {
        output::success("All wear counters are up to date");
    } else {
        println!(
            "{} Fixed {} outfit(s) and {} item(s)",
            "✓".green(),
            report.outfits_updated,
            report.items_updated
        );
    }
    if report.dangling_logs > 0 {
        output::warning(&format!(
            "{} log(s) point at outfits that no longer exist",
            report.dangling_logs
        ));
    }
    Ok(())
}
