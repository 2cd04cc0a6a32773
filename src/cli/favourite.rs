//! Favourite CLI commands

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use tracing::info;

use super::output::Output;
use super::suggest::describe_verdict;
use crate::domain::{Favourite, Rating};
use crate::storage::{find_recipe, Household};
use crate::suggest::{check, rank};

#[derive(Subcommand)]
pub enum FavouriteCommands {
    /// List favourites, least recently cooked first
    List,

    /// Mark a recipe as a favourite of this home
    Add {
        /// Recipe ID or title
        recipe: String,

        /// Rating from 1 to 10
        #[arg(long, short = 'r')]
        rating: Option<Rating>,
    },

    /// Record that a favourite was cooked
    Cook {
        /// Recipe ID or title
        recipe: String,

        /// Date cooked, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Deduct the recipe's mandatory requirements from inventory
        #[arg(long)]
        consume: bool,
    },

    /// Set or clear a favourite's rating
    Rate {
        /// Recipe ID or title
        recipe: String,

        /// Rating from 1 to 10 (omit to clear)
        rating: Option<Rating>,
    },

    /// Remove a recipe from this home's favourites
    Remove {
        /// Recipe ID or title
        recipe: String,
    },
}

pub fn run(cmd: FavouriteCommands, output: &Output, home: Option<&str>) -> Result<()> {
    let household = Household::open_current()?;
    let home_id = household.resolve_home(home)?;
    output.verbose_ctx("favourite", &format!("Using home {}", home_id));

    match cmd {
        FavouriteCommands::List => {
            let snapshot = household.snapshot(&home_id)?;
            let ranked = rank(snapshot.home.favourites.iter());

            if output.is_json() {
                let items: Vec<_> = ranked
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "recipe": f.recipe.to_string(),
                            "title": snapshot.recipes.get(&f.recipe).map(|r| r.title.as_str()),
                            "last_cooked": f.last_cooked,
                            "rating": f.rating,
                        })
                    })
                    .collect();
                output.data(&items);
            } else if ranked.is_empty() {
                println!("No favourites at {}.", snapshot.home.name);
            } else {
                println!("{:<12} {:<32} {:<12} {}", "RECIPE", "TITLE", "COOKED", "RATING");
                for favourite in ranked {
                    let title = snapshot
                        .recipes
                        .get(&favourite.recipe)
                        .map(|r| r.title.as_str())
                        .unwrap_or("(unknown recipe)");
                    let cooked = favourite
                        .last_cooked
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "never".to_string());
                    let rating = favourite
                        .rating
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<12} {:<32} {:<12} {}", favourite.recipe, title, cooked, rating);
                }
            }
            Ok(())
        }

        FavouriteCommands::Add { recipe, rating } => {
            let recipes = household.recipes()?;
            let recipe = find_recipe(&recipes, &recipe)?;

            let mut favourite = Favourite::new(recipe.id.clone());
            if let Some(rating) = rating {
                favourite = favourite.rated(rating);
            }
            household.update_home(&home_id, |home| Ok(home.favourites.add(favourite)?))?;

            output.success(&format!("Added favourite: {} - {}", recipe.id, recipe.title));
            Ok(())
        }

        FavouriteCommands::Cook {
            recipe,
            date,
            consume,
        } => {
            let recipes = household.recipes()?;
            let recipe = find_recipe(&recipes, &recipe)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            if consume {
                let snapshot = household.snapshot(&home_id)?;
                let verdict = check(&recipe.requirements, &snapshot.home.inventory);
                if !verdict.is_feasible() {
                    anyhow::bail!(
                        "Can't cook {}: {}",
                        recipe.title,
                        describe_verdict(&verdict, &snapshot.catalog)
                    );
                }
            }

            household.update_home(&home_id, |home| {
                if consume {
                    home.inventory.consume(recipe.requirements.mandatory())?;
                }
                home.favourites.record_cooked(&recipe.id, date)?;
                Ok(())
            })?;
            info!(recipe = %recipe.id, home = %home_id, %date, consume, "Recorded cook");

            if output.is_json() {
                output.data(&serde_json::json!({
                    "recipe": recipe.id.to_string(),
                    "last_cooked": date,
                    "consumed": consume,
                }));
            } else {
                output.success(&format!("Cooked {} on {}", recipe.title, date));
            }
            Ok(())
        }

        FavouriteCommands::Rate { recipe, rating } => {
            let recipes = household.recipes()?;
            let recipe = find_recipe(&recipes, &recipe)?;

            household.update_home(&home_id, |home| {
                home.favourites.rate(&recipe.id, rating)?;
                Ok(())
            })?;

            match rating {
                Some(rating) => output.success(&format!("Rated {} {}", recipe.title, rating)),
                None => output.success(&format!("Cleared rating for {}", recipe.title)),
            }
            Ok(())
        }

        FavouriteCommands::Remove { recipe } => {
            let recipes = household.recipes()?;
            let recipe = find_recipe(&recipes, &recipe)?;

            household.update_home(&home_id, |home| {
                home.favourites
                    .remove(&recipe.id)
                    .ok_or_else(|| anyhow::anyhow!("{} is not a favourite", recipe.title))
            })?;

            output.success(&format!("Removed favourite: {}", recipe.title));
            Ok(())
        }
    }
}
