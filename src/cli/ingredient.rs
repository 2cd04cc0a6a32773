//! Ingredient catalog CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::Ingredient;
use crate::storage::{find_ingredient, Household};

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// Add an ingredient to the catalog
    Add {
        /// Ingredient name (unique, case-insensitive)
        name: String,
    },

    /// List catalog ingredients
    List,

    /// Remove an ingredient, dropping it from every recipe and inventory
    Remove {
        /// Ingredient ID or name
        ingredient: String,
    },
}

pub fn run(cmd: IngredientCommands, output: &Output) -> Result<()> {
    match cmd {
        IngredientCommands::Add { name } => add_ingredient(output, &name),
        IngredientCommands::List => list_ingredients(output),
        IngredientCommands::Remove { ingredient } => remove_ingredient(output, &ingredient),
    }
}

fn add_ingredient(output: &Output, name: &str) -> Result<()> {
    let household = Household::open_current()?;
    let mut catalog = household.catalog()?;

    let ingredient = Ingredient::new(name)?;
    let id = ingredient.id.clone();
    let name = ingredient.name.clone();
    catalog.add(ingredient)?;
    household.save_catalog(&catalog)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "name": name,
        }));
    } else {
        output.success(&format!("Added ingredient: {} - {}", id, name));
    }

    Ok(())
}

fn list_ingredients(output: &Output) -> Result<()> {
    let household = Household::open_current()?;
    let catalog = household.catalog()?;

    if output.is_json() {
        let items: Vec<_> = catalog.iter().collect();
        output.data(&items);
    } else if catalog.is_empty() {
        println!("No ingredients in the catalog.");
    } else {
        for ingredient in catalog.iter() {
            println!("{:<12} {}", ingredient.id, ingredient.name);
        }
    }

    Ok(())
}

fn remove_ingredient(output: &Output, ingredient: &str) -> Result<()> {
    let household = Household::open_current()?;
    let catalog = household.catalog()?;
    let id = find_ingredient(&catalog, ingredient)?.id.clone();

    let removed = household.remove_ingredient(&id)?;

    output.success(&format!("Removed ingredient: {} - {}", removed.id, removed.name));
    Ok(())
}
