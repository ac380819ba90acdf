//! Outfit commands - assemble items into outfits

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use wardrobe_core::domain::Season;
use wardrobe_core::services::{NewOutfit, OutfitUpdate};

use super::Session;
use crate::output::{self, create_table, format_average, format_last_worn, or_dash};

#[derive(Subcommand)]
pub enum OutfitCommands {
    /// Create an outfit from item ids
    Create {
        /// Outfit name
        name: String,
        /// Item ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Seasons (comma-separated)
        #[arg(long, value_delimiter = ',')]
        seasons: Vec<Season>,
        /// Occasions (comma-separated)
        #[arg(long, value_delimiter = ',')]
        occasions: Vec<String>,
    },
    /// List all outfits
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one outfit
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an outfit; changing the items refreshes its preview images
    Edit {
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Replacement item ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        items: Option<Vec<String>>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
        /// Seasons (comma-separated)
        #[arg(long, value_delimiter = ',')]
        seasons: Option<Vec<Season>>,
        /// Occasions (comma-separated)
        #[arg(long, value_delimiter = ',')]
        occasions: Option<Vec<String>>,
    },
    /// Mark or unmark an outfit as favorite
    Fav {
        id: String,
        /// Clear the favorite flag instead of setting it
        #[arg(long)]
        off: bool,
    },
    /// Delete an outfit
    Rm { id: String },
}

impl OutfitCommands {
    pub fn json(&self) -> bool {
        matches!(self, OutfitCommands::List { json: true, .. } | OutfitCommands::Show { json: true, .. })
    }
}

pub async fn run(session: Session, command: OutfitCommands) -> Result<()> {
    let service = &session.ctx.outfit_service;
    let user = session.user_id.as_str();

    match command {
        OutfitCommands::Create { name, items, description, seasons, occasions } => {
            let new = NewOutfit {
                name,
                description,
                items,
                seasons,
                occasions,
                ..Default::default()
            };
            let id = service.create_outfit(user, new).await?;
            output::success(&format!("Created outfit {}", id));
        }
        OutfitCommands::List { favorites, json } => {
            let mut outfits = service.get_outfits(user).await?;
            if favorites {
                outfits.retain(|o| o.favorite);
            }
            if json {
                return output::print_json(&outfits);
            }
            if outfits.is_empty() {
                output::info("No outfits yet. Create one with `wd outfit create`.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Items", "Wears", "Avg", "Last worn"]);
            for outfit in &outfits {
                let name = if outfit.favorite {
                    format!("{} ♥", outfit.name)
                } else {
                    outfit.name.clone()
                };
                table.add_row(vec![
                    outfit.id.clone(),
                    name,
                    outfit.items.len().to_string(),
                    outfit.wear_count.to_string(),
                    format_average(outfit.average_rating()),
                    format_last_worn(outfit.last_worn),
                ]);
            }
            println!("{}", table);
        }
        OutfitCommands::Show { id, json } => {
            let Some(outfit) = service.get_outfit(user, &id).await? else {
                bail!("Outfit not found: {}", id);
            };
            if json {
                return output::print_json(&outfit);
            }

            let title = if outfit.favorite {
                format!("{} ♥", outfit.name)
            } else {
                outfit.name.clone()
            };
            println!("{}", title.bold());
            if let Some(description) = &outfit.description {
                println!("{}", description);
            }
            println!();

            let items = session.ctx.wardrobe_service.get_wardrobe_items(user).await?;
            let mut table = create_table();
            table.set_header(vec!["Item", "Name", "Category"]);
            for item_id in &outfit.items {
                match items.iter().find(|i| &i.id == item_id) {
                    Some(item) => table.add_row(vec![
                        item_id.as_str(),
                        item.name.as_str(),
                        item.category.as_str(),
                    ]),
                    None => table.add_row(vec![item_id.as_str(), "(deleted)", "-"]),
                };
            }
            println!("{}", table);
            println!(
                "Worn {} time(s), average {}, last worn {}",
                outfit.wear_count,
                format_average(outfit.average_rating()),
                format_last_worn(outfit.last_worn)
            );
            println!("Occasions: {}", or_dash(Some(outfit.occasions.join(", ").as_str())));
        }
        OutfitCommands::Edit { id, name, items, description, notes, seasons, occasions } => {
            let update = OutfitUpdate {
                name,
                description,
                notes,
                image: None,
                items,
                seasons,
                occasions,
            };
            service.update_outfit(user, &id, update).await?;
            output::success(&format!("Updated outfit {}", id));
        }
        OutfitCommands::Fav { id, off } => {
            service.toggle_outfit_favorite(user, &id, !off).await?;
            if off {
                output::success(&format!("Removed {} from favorites", id));
            } else {
                output::success(&format!("Marked {} as favorite", id));
            }
        }
        OutfitCommands::Rm { id } => {
            service.delete_outfit(user, &id).await?;
            output::success(&format!("Deleted outfit {}", id));
        }
    }

    Ok(())
}
