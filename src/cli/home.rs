//! Home CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Home, HomeId};
use crate::storage::Household;

#[derive(Subcommand)]
pub enum HomeCommands {
    /// Create a home (the first one becomes the default)
    Add {
        /// Home name
        name: String,
    },

    /// List homes
    List,

    /// Show the selected home
    Show,

    /// Rename the selected home
    Rename {
        /// New name
        name: String,
    },

    /// Delete a home with its inventory and favourites
    Remove {
        /// Home ID
        id: String,
    },

    /// Make a home the default for later commands
    Use {
        /// Home ID
        id: String,
    },
}

pub fn run(cmd: HomeCommands, output: &Output, home: Option<&str>) -> Result<()> {
    match cmd {
        HomeCommands::Add { name } => add_home(output, &name),
        HomeCommands::List => list_homes(output),
        HomeCommands::Show => show_home(output, home),
        HomeCommands::Rename { name } => rename_home(output, home, &name),
        HomeCommands::Remove { id } => remove_home(output, &id),
        HomeCommands::Use { id } => use_home(output, &id),
    }
}

fn add_home(output: &Output, name: &str) -> Result<()> {
    let mut household = Household::open_current()?;

    let home = Home::new(name)?;
    let id = home.id.clone();
    let name = home.name.clone();
    let first = household.add_home(home)? == 1;

    if first && household.config().household.default_home.is_none() {
        output.verbose_ctx("home", &format!("Making {} the default home", id));
        household.config_mut().household.default_home = Some(id.clone());
        household.config().save_household()?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "name": name,
            "default": first,
        }));
    } else {
        output.success(&format!("Created home: {} - {}", id, name));
    }

    Ok(())
}

fn list_homes(output: &Output) -> Result<()> {
    let household = Household::open_current()?;
    let homes = household.homes()?;
    let default = household.config().household.default_home.as_ref();

    if output.is_json() {
        let items: Vec<_> = homes
            .values()
            .map(|h| {
                serde_json::json!({
                    "id": h.id.to_string(),
                    "name": h.name,
                    "default": Some(&h.id) == default,
                    "inventory": h.inventory.len(),
                    "favourites": h.favourites.len(),
                })
            })
            .collect();
        output.data(&items);
    } else if homes.is_empty() {
        println!("No homes yet. Create one with 'larder home add <NAME>'.");
    } else {
        println!("  {:<12} {:<24} {:>6} {:>6}", "ID", "NAME", "STOCK", "FAVS");
        for home in homes.values() {
            let marker = if Some(&home.id) == default { "*" } else { " " };
            println!(
                "{} {:<12} {:<24} {:>6} {:>6}",
                marker,
                home.id,
                home.name,
                home.inventory.len(),
                home.favourites.len()
            );
        }
    }

    Ok(())
}

fn show_home(output: &Output, home: Option<&str>) -> Result<()> {
    let household = Household::open_current()?;
    let home_id = household.resolve_home(home)?;
    let snapshot = household.snapshot(&home_id)?;
    let home = &snapshot.home;

    if output.is_json() {
        output.data(home);
        return Ok(());
    }

    println!("Home: {} - {}", home.id, home.name);
    println!("Created: {}", home.created_at.format("%Y-%m-%d"));
    println!();

    println!("Inventory ({}):", home.inventory.len());
    for entry in home.inventory.iter() {
        println!(
            "  {:<24} {} {}",
            snapshot.catalog.name_of(&entry.ingredient),
            entry.quantity,
            entry.unit
        );
    }
    println!();

    println!("Favourites ({}):", home.favourites.len());
    for favourite in home.favourites.iter() {
        let title = snapshot
            .recipes
            .get(&favourite.recipe)
            .map(|r| r.title.as_str())
            .unwrap_or("(unknown recipe)");
        println!("  {} - {}", favourite.recipe, title);
    }

    Ok(())
}

fn rename_home(output: &Output, home: Option<&str>, name: &str) -> Result<()> {
    let household = Household::open_current()?;
    let home_id = household.resolve_home(home)?;

    let name = household.update_home(&home_id, |home| {
        home.rename(name)?;
        Ok(home.name.clone())
    })?;

    output.success(&format!("Renamed home {} to {}", home_id, name));
    Ok(())
}

fn remove_home(output: &Output, id: &str) -> Result<()> {
    let mut household = Household::open_current()?;
    let home_id: HomeId = id.parse()?;

    let home = household.remove_home(&home_id)?;
    output.verbose_ctx(
        "home",
        &format!(
            "Dropped {} inventory entries and {} favourites",
            home.inventory.len(),
            home.favourites.len()
        ),
    );

    output.success(&format!("Removed home: {} - {}", home.id, home.name));
    Ok(())
}

fn use_home(output: &Output, id: &str) -> Result<()> {
    let mut household = Household::open_current()?;
    let home_id = household.resolve_home(Some(id))?;

    household.config_mut().household.default_home = Some(home_id.clone());
    household.config().save_household()?;

    output.success(&format!("Default home is now {}", home_id));
    Ok(())
}
