//! Suggest command

use anyhow::Result;
use thiserror::Error;

use super::output::Output;
use crate::domain::{HomeId, IngredientCatalog};
use crate::storage::{HomeSnapshot, Household};
use crate::suggest::{Feasibility, Suggestion};

/// Returned when no favourite can be cooked with the current stock
///
/// [`run`](super::run) maps this to its own exit code so scripts can tell "nothing to
/// cook" apart from a real failure.
#[derive(Debug, Error)]
#[error("Nothing on the favourites list of {home_name} can be cooked right now")]
pub struct NoSuggestion {
    pub home: HomeId,
    pub home_name: String,
}

/// Renders a verdict with ingredient names instead of IDs
pub(super) fn describe_verdict(verdict: &Feasibility, catalog: &IngredientCatalog) -> String {
    match verdict {
        Feasibility::Feasible => "feasible".to_string(),
        Feasibility::Missing { ingredient } => {
            format!("no {} in stock", catalog.name_of(ingredient))
        }
        Feasibility::Short {
            ingredient,
            required,
            available,
        } => format!(
            "short on {} (need {}, have {})",
            catalog.name_of(ingredient),
            required,
            available
        ),
    }
}

pub fn run(output: &Output, home: Option<&str>, explain: bool) -> Result<()> {
    let household = Household::open_current()?;
    let home_id = household.resolve_home(home)?;
    let snapshot = household.snapshot(&home_id)?;
    let suggestion = snapshot.suggest();

    if output.is_json() {
        let picked = suggestion.map(|s| suggestion_json(&home_id, s));
        if explain {
            output.data(&serde_json::json!({
                "candidates": snapshot.explain(),
                "suggestion": picked,
            }));
        } else if let Some(picked) = &picked {
            output.data(picked);
        }
    } else {
        if explain {
            print_explanation(&snapshot);
        }
        if let Some(suggestion) = suggestion {
            if explain {
                println!();
            }
            print_suggestion(suggestion);
        }
    }

    if suggestion.is_none() {
        return Err(NoSuggestion {
            home: home_id,
            home_name: snapshot.home.name.clone(),
        }
        .into());
    }
    Ok(())
}

fn suggestion_json(home_id: &HomeId, suggestion: Suggestion<'_>) -> serde_json::Value {
    serde_json::json!({
        "home": home_id.to_string(),
        "recipe": suggestion.recipe.id.to_string(),
        "recipe_title": suggestion.recipe.title,
        "last_cooked": suggestion.favourite.last_cooked,
        "rating": suggestion.favourite.rating,
    })
}

fn print_suggestion(suggestion: Suggestion<'_>) {
    println!("Cook {} ({})", suggestion.recipe.title, suggestion.recipe.id);
    match suggestion.favourite.last_cooked {
        Some(date) => println!("Last cooked: {}", date),
        None => println!("Never cooked here before"),
    }
    if let Some(minutes) = suggestion.recipe.time_minutes {
        println!("Takes about {} min", minutes);
    }
    if let Some(link) = &suggestion.recipe.link {
        println!("{}", link);
    }
}

fn print_explanation(snapshot: &HomeSnapshot) {
    let candidates = snapshot.explain();

    println!("{:<12} {:<28} {:<12} {}", "RECIPE", "TITLE", "COOKED", "VERDICT");
    for candidate in &candidates {
        let title = candidate
            .recipe
            .map(|r| r.title.as_str())
            .unwrap_or("(unknown recipe)");
        let cooked = candidate
            .favourite
            .last_cooked
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        let verdict = match &candidate.feasibility {
            Some(verdict) => describe_verdict(verdict, &snapshot.catalog),
            None => "recipe missing".to_string(),
        };
        println!(
            "{:<12} {:<28} {:<12} {}",
            candidate.favourite.recipe, title, cooked, verdict
        );
    }
}
