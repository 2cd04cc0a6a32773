//! Inventory CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Amount, HomeError, HomeId, InventoryEntry, Unit};
use crate::storage::{find_ingredient, Household};

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// List what the home has in stock
    List,

    /// Set the stocked quantity of an ingredient
    Set {
        /// Ingredient ID or name
        ingredient: String,

        /// Quantity on hand
        #[arg(allow_hyphen_values = true)]
        amount: Amount,

        /// Unit label (defaults to the household's default unit)
        #[arg(long, short = 'u')]
        unit: Option<Unit>,
    },

    /// Add to or take from a stocked ingredient
    Adjust {
        /// Ingredient ID or name
        ingredient: String,

        /// Signed change, e.g. 200 or -50
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },

    /// Stop tracking an ingredient in this home
    Remove {
        /// Ingredient ID or name
        ingredient: String,
    },
}

pub fn run(cmd: InventoryCommands, output: &Output, home: Option<&str>) -> Result<()> {
    let household = Household::open_current()?;
    let home_id = household.resolve_home(home)?;
    output.verbose_ctx("inventory", &format!("Using home {}", home_id));

    match cmd {
        InventoryCommands::List => list_inventory(output, &household, &home_id),
        InventoryCommands::Set {
            ingredient,
            amount,
            unit,
        } => {
            let catalog = household.catalog()?;
            let ingredient = find_ingredient(&catalog, &ingredient)?;
            let unit = unit.unwrap_or_else(|| household.config().household.default_unit.clone());
            let entry = InventoryEntry::new(ingredient.id.clone(), amount).with_unit(unit);
            let label = format!("{} {}", entry.quantity, entry.unit);

            let previous = household.update_home(&home_id, |home| Ok(home.inventory.set(entry)))?;
            if let Some(previous) = previous {
                output.verbose_ctx(
                    "inventory",
                    &format!("Replaced {} {}", previous.quantity, previous.unit),
                );
            }

            output.success(&format!("{}: {}", ingredient.name, label));
            Ok(())
        }
        InventoryCommands::Adjust { ingredient, delta } => {
            let catalog = household.catalog()?;
            let ingredient = find_ingredient(&catalog, &ingredient)?;

            let quantity =
                household.update_home(&home_id, |home| Ok(home.inventory.adjust(&ingredient.id, delta)?))?;

            if output.is_json() {
                output.data(&serde_json::json!({
                    "ingredient": ingredient.id.to_string(),
                    "quantity": quantity,
                }));
            } else {
                output.success(&format!("{}: {}", ingredient.name, quantity));
            }
            Ok(())
        }
        InventoryCommands::Remove { ingredient } => {
            let catalog = household.catalog()?;
            let ingredient = find_ingredient(&catalog, &ingredient)?;

            household.update_home(&home_id, |home| {
                home.inventory
                    .remove(&ingredient.id)
                    .ok_or_else(|| HomeError::NotStocked(ingredient.id.clone()).into())
            })?;

            output.success(&format!("Stopped tracking {}", ingredient.name));
            Ok(())
        }
    }
}

fn list_inventory(output: &Output, household: &Household, home_id: &HomeId) -> Result<()> {
    let snapshot = household.snapshot(home_id)?;
    let inventory = &snapshot.home.inventory;

    if output.is_json() {
        let items: Vec<_> = inventory
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "ingredient": entry.ingredient.to_string(),
                    "name": snapshot.catalog.name_of(&entry.ingredient),
                    "quantity": entry.quantity,
                    "unit": entry.unit,
                })
            })
            .collect();
        output.data(&items);
    } else if inventory.is_empty() {
        println!("Nothing in stock at {}.", snapshot.home.name);
    } else {
        for entry in inventory.iter() {
            println!(
                "{:<12} {:<24} {} {}",
                entry.ingredient,
                snapshot.catalog.name_of(&entry.ingredient),
                entry.quantity,
                entry.unit
            );
        }
    }

    Ok(())
}
