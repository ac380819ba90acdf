//! Item commands - manage wardrobe items

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use wardrobe_core::domain::{Category, Season, WardrobeItem};
use wardrobe_core::services::ItemUpdate;

use super::Session;
use crate::output::{self, create_table, format_average, format_last_worn, or_dash};

#[derive(Args, Default)]
pub struct ItemFields {
    /// Brand
    #[arg(long)]
    brand: Option<String>,
    /// Size label
    #[arg(long)]
    size: Option<String>,
    /// Color
    #[arg(long)]
    color: Option<String>,
    /// Material
    #[arg(long)]
    material: Option<String>,
    /// Purchase price
    #[arg(long)]
    price: Option<Decimal>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,
    /// Seasons (comma-separated: spring,summer,autumn,winter,all)
    #[arg(long, value_delimiter = ',')]
    seasons: Option<Vec<Season>>,
    /// Occasions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    occasions: Option<Vec<String>>,
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to the wardrobe
    Add {
        /// Item name
        name: String,
        /// Category (tops, bottoms, dresses, outerwear, shoes, accessories, underwear, activewear)
        #[arg(long, short)]
        category: Category,
        #[command(flatten)]
        fields: ItemFields,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },
    /// List all items
    List {
        /// Only items in this category
        #[arg(long, short)]
        category: Option<Category>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one item
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an item's details
    Edit {
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(long, short)]
        category: Option<Category>,
        #[command(flatten)]
        fields: ItemFields,
        /// Set the favorite flag
        #[arg(long)]
        favorite: Option<bool>,
    },
    /// Delete an item
    Rm { id: String },
}

impl ItemCommands {
    pub fn json(&self) -> bool {
        matches!(self, ItemCommands::List { json: true, .. } | ItemCommands::Show { json: true, .. })
    }
}

pub async fn run(session: Session, command: ItemCommands) -> Result<()> {
    let service = &session.ctx.wardrobe_service;
    let user = session.user_id.as_str();

    match command {
        ItemCommands::Add { name, category, fields, favorite } => {
            let mut item = WardrobeItem::new(name, category);
            item.brand = fields.brand;
            item.size = fields.size;
            item.color = fields.color;
            item.material = fields.material;
            item.price = fields.price;
            item.image = fields.image;
            item.notes = fields.notes;
            item.seasons = fields.seasons.unwrap_or_default();
            item.occasions = fields.occasions.unwrap_or_default();
            item.favorite = favorite;

            let id = service.add_wardrobe_item(user, item).await?;
            output::success(&format!("Added item {}", id));
        }
        ItemCommands::List { category, json } => {
            let mut items = service.get_wardrobe_items(user).await?;
            if let Some(category) = category {
                items.retain(|i| i.category == category);
            }
            if json {
                return output::print_json(&items);
            }
            if items.is_empty() {
                output::info("No items yet. Add one with `wd item add`.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["ID", "Name", "Category", "Wears", "Avg", "Cost/wear", "Last worn"]);
            for item in &items {
                let name = if item.favorite {
                    format!("{} ♥", item.name)
                } else {
                    item.name.clone()
                };
                table.add_row(vec![
                    item.id.clone(),
                    name,
                    item.category.to_string(),
                    item.wear_count.to_string(),
                    format_average(item.average_rating()),
                    item.cost_per_wear()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    format_last_worn(item.last_worn),
                ]);
            }
            println!("{}", table);
        }
        ItemCommands::Show { id, json } => {
            let Some(item) = service.get_wardrobe_item(user, &id).await? else {
                bail!("Item not found: {}", id);
            };
            if json {
                return output::print_json(&item);
            }

            println!("{}", item.name.bold());
            let seasons: Vec<String> = item.seasons.iter().map(|s| s.to_string()).collect();
            let price = item.price.map(|p| p.to_string());
            let mut table = create_table();
            table.add_row(vec!["Category", item.category.as_str()]);
            table.add_row(vec!["Brand", or_dash(item.brand.as_deref())]);
            table.add_row(vec!["Size", or_dash(item.size.as_deref())]);
            table.add_row(vec!["Color", or_dash(item.color.as_deref())]);
            table.add_row(vec!["Material", or_dash(item.material.as_deref())]);
            table.add_row(vec!["Price", or_dash(price.as_deref())]);
            table.add_row(vec!["Seasons".to_string(), seasons.join(", ")]);
            table.add_row(vec!["Occasions".to_string(), item.occasions.join(", ")]);
            table.add_row(vec!["Wears".to_string(), item.wear_count.to_string()]);
            table.add_row(vec!["Average rating".to_string(), format_average(item.average_rating())]);
            table.add_row(vec!["Last worn".to_string(), format_last_worn(item.last_worn)]);
            println!("{}", table);

            if !item.usage_history.is_empty() {
                println!();
                println!("{}", "Recent wears".bold());
                for entry in item.usage_history.iter().rev().take(10) {
                    println!("  {}  outfit {}", entry.date, entry.outfit_id);
                }
            }
        }
        ItemCommands::Edit { id, name, category, fields, favorite } => {
            let update = ItemUpdate {
                name,
                category,
                brand: fields.brand,
                size: fields.size,
                color: fields.color,
                material: fields.material,
                price: fields.price,
                image: fields.image,
                notes: fields.notes,
                seasons: fields.seasons,
                occasions: fields.occasions,
                favorite,
            };
            service.update_wardrobe_item(user, &id, update).await?;
            output::success(&format!("Updated item {}", id));
        }
        ItemCommands::Rm { id } => {
            service.delete_wardrobe_item(user, &id).await?;
            output::success(&format!("Deleted item {}", id));
        }
    }

    Ok(())
}
