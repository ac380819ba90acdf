//! Config command - view and edit settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use wardrobe_core::config::Config;

use super::get_data_dir;
use crate::output::{self, create_table, or_dash};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the default user id
    SetUser { user_id: String },
    /// Set how many logs `history` shows by default
    SetLimit {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },
    /// Set the log file level (trace, debug, info, warn, error)
    SetLogLevel { level: String },
}

impl ConfigCommands {
    pub fn json(&self) -> bool {
        matches!(self, ConfigCommands::Show { json: true })
    }
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;
            if json {
                return output::print_json(&config);
            }

            let mut table = create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["Data directory".to_string(), data_dir.display().to_string()]);
            table.add_row(vec!["User".to_string(), or_dash(config.user_id.as_deref()).to_string()]);
            table.add_row(vec!["History limit".to_string(), config.daily_log_limit.to_string()]);
            table.add_row(vec!["Log level".to_string(), config.log_level]);
            println!("{table}");
            Ok(())
        }
        ConfigCommands::SetUser { user_id } => {
            let user_id = user_id.trim().to_string();
            if user_id.is_empty() {
                bail!("User id cannot be empty");
            }
            let mut config = Config::load_file(&data_dir)?;
            config.user_id = Some(user_id.clone());
            config.save(&data_dir)?;
            output::success(&format!("Default user set to {}", user_id));
            Ok(())
        }
        ConfigCommands::SetLimit { limit } => {
            let mut config = Config::load_file(&data_dir)?;
            config.daily_log_limit = limit as usize;
            config.save(&data_dir)?;
            output::success(&format!("History limit set to {}", limit));
            Ok(())
        }
        ConfigCommands::SetLogLevel { level } => {
            let level = level.trim().to_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                bail!("Unknown log level: {}. Use one of: {}", level, LOG_LEVELS.join(", "));
            }
            let mut config = Config::load_file(&data_dir)?;
            config.log_level = level.clone();
            config.save(&data_dir)?;
            output::success(&format!("Log level set to {}", level));
            Ok(())
        }
    }
}
