//! Wardrobe CLI - wear logging and usage stats in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wardrobe_core::services::DailyLogUpdate;

mod commands;
mod output;

use commands::{config, get_session, item, log, outfit, reconcile, stats};

/// wd - track what you wear
#[derive(Parser)]
#[command(name = "wd", version, about, long_about = None)]
struct Cli {
    /// User id to act as (overrides settings.json)
    #[arg(long, global = true, env = "WARDROBE_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage wardrobe items
    Item {
        #[command(subcommand)]
        command: item::ItemCommands,
    },

    /// Manage outfits
    Outfit {
        #[command(subcommand)]
        command: outfit::OutfitCommands,
    },

    /// Log the outfit worn today
    Log {
        /// Outfit id
        outfit_id: String,
        /// Rating from 0 to 5, 0 = unrated
        #[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: Option<u8>,
        /// Notes
        #[arg(long, short)]
        notes: Option<String>,
        /// Occasion (work, party, ...)
        #[arg(long)]
        occasion: Option<String>,
        /// Photo file to upload with the log
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Already-hosted photo URLs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        photo_url: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Amend a daily log
    EditLog {
        /// Log id
        log_id: String,
        /// Rating from 0 to 5, 0 = unrated
        #[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: Option<u8>,
        #[arg(long, short)]
        notes: Option<String>,
        #[arg(long)]
        occasion: Option<String>,
    },

    /// Show today's outfit
    Today {
        /// Show another day instead (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent daily logs
    History {
        /// Number of logs to show (default from settings)
        #[arg(long, short)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the usage dashboard
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show wear statistics for an item
    ItemStats {
        item_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show wear statistics for an outfit
    OutfitStats {
        outfit_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild wear counters from the daily logs
    Reconcile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },
}

impl Commands {
    /// Whether output was requested as JSON
    fn json(&self) -> bool {
        match self {
            Commands::Item { command } => command.json(),
            Commands::Outfit { command } => command.json(),
            Commands::Config { command } => command.as_ref().is_some_and(|c| c.json()),
            Commands::Log { json, .. }
            | Commands::Today { json, .. }
            | Commands::History { json, .. }
            | Commands::Stats { json }
            | Commands::ItemStats { json, .. }
            | Commands::OutfitStats { json, .. }
            | Commands::Reconcile { json } => *json,
            Commands::EditLog { .. } => false,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.command.json();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if json => {
            output::print_json_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        // Settings can be edited before any user is configured
        Commands::Config { command } => return config::run(command),
        command => command,
    };
    let session = get_session(cli.user)?;

    match command {
        Commands::Item { command } => item::run(session, command).await,
        Commands::Outfit { command } => outfit::run(session, command).await,
        Commands::Log { outfit_id, rating, notes, occasion, photo, photo_url, json } => {
            let args = log::LogArgs {
                outfit_id,
                rating,
                notes,
                occasion,
                photo,
                photo_urls: photo_url,
                json,
            };
            log::run(session, args).await
        }
        Commands::EditLog { log_id, rating, notes, occasion } => {
            let update = DailyLogUpdate {
                rating,
                notes,
                occasion,
                photos: None,
            };
            log::run_edit(session, &log_id, update).await
        }
        Commands::Today { date, json } => log::run_today(session, date, json).await,
        Commands::History { limit, json } => log::run_history(session, limit, json).await,
        Commands::Stats { json } => stats::run(session, json).await,
        Commands::ItemStats { item_id, json } => stats::run_item(session, &item_id, json).await,
        Commands::OutfitStats { outfit_id, json } => stats::run_outfit(session, &outfit_id, json).await,
        Commands::Reconcile { json } => reconcile::run(session, json).await,
        Commands::Config { command } => config::run(command),
    }
}
