//! Recipe CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Amount, IngredientRequirement, Recipe, Unit};
use crate::storage::{find_ingredient, find_recipe, Household, HouseholdError};

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Add a recipe
    Add {
        /// Recipe title
        title: String,

        /// Cooking time in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Link to the full recipe
        #[arg(long)]
        link: Option<String>,

        /// Short description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// List recipes
    List,

    /// Show a recipe with its requirements
    Show {
        /// Recipe ID or title
        recipe: String,
    },

    /// Remove a recipe and unfavourite it everywhere
    Remove {
        /// Recipe ID or title
        recipe: String,
    },

    /// Record that a recipe needs an ingredient
    Require {
        /// Recipe ID or title
        recipe: String,

        /// Ingredient ID or name
        ingredient: String,

        /// Amount needed
        #[arg(allow_hyphen_values = true)]
        amount: Amount,

        /// Unit label (defaults to the household's default unit)
        #[arg(long, short = 'u')]
        unit: Option<Unit>,

        /// Never block a suggestion on this ingredient
        #[arg(long)]
        optional: bool,

        /// Replace an existing requirement for the same ingredient
        #[arg(long)]
        replace: bool,
    },

    /// Drop an ingredient requirement from a recipe
    Unrequire {
        /// Recipe ID or title
        recipe: String,

        /// Ingredient ID or name
        ingredient: String,
    },
}

pub fn run(cmd: RecipeCommands, output: &Output) -> Result<()> {
    match cmd {
        RecipeCommands::Add {
            title,
            minutes,
            link,
            description,
            tags,
        } => add_recipe(output, &title, minutes, link, description, tags),
        RecipeCommands::List => list_recipes(output),
        RecipeCommands::Show { recipe } => show_recipe(output, &recipe),
        RecipeCommands::Remove { recipe } => remove_recipe(output, &recipe),
        RecipeCommands::Require {
            recipe,
            ingredient,
            amount,
            unit,
            optional,
            replace,
        } => require(output, &recipe, &ingredient, amount, unit, optional, replace),
        RecipeCommands::Unrequire { recipe, ingredient } => unrequire(output, &recipe, &ingredient),
    }
}

fn add_recipe(
    output: &Output,
    title: &str,
    minutes: Option<u32>,
    link: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let household = Household::open_current()?;

    let mut recipe = Recipe::new(title)?;
    recipe.time_minutes = minutes;
    recipe.link = link;
    recipe.description = description.unwrap_or_default();
    for tag in &tags {
        recipe.add_tag(tag);
    }

    let id = recipe.id.clone();
    let title = recipe.title.clone();
    household.add_recipe(recipe)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "title": title,
        }));
    } else {
        output.success(&format!("Added recipe: {} - {}", id, title));
    }

    Ok(())
}

fn list_recipes(output: &Output) -> Result<()> {
    let household = Household::open_current()?;
    let recipes = household.recipes()?;

    if output.is_json() {
        let items: Vec<_> = recipes.values().collect();
        output.data(&items);
    } else if recipes.is_empty() {
        println!("No recipes yet.");
    } else {
        println!("{:<12} {:<32} {:>5} {:>6}", "ID", "TITLE", "NEEDS", "MIN");
        for recipe in recipes.values() {
            let minutes = recipe
                .time_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<32} {:>5} {:>6}",
                recipe.id,
                recipe.title,
                recipe.requirements.len(),
                minutes
            );
        }
    }

    Ok(())
}

fn show_recipe(output: &Output, recipe: &str) -> Result<()> {
    let household = Household::open_current()?;
    let recipes = household.recipes()?;
    let catalog = household.catalog()?;
    let recipe = find_recipe(&recipes, recipe)?;

    if output.is_json() {
        output.data(recipe);
        return Ok(());
    }

    println!("Recipe: {} - {}", recipe.id, recipe.title);
    if let Some(minutes) = recipe.time_minutes {
        println!("Time: {} min", minutes);
    }
    if let Some(link) = &recipe.link {
        println!("Link: {}", link);
    }
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }
    if !recipe.description.is_empty() {
        println!();
        println!("{}", recipe.description);
    }
    println!();

    println!("Requirements ({}):", recipe.requirements.len());
    for req in recipe.requirements.iter() {
        let marker = if req.mandatory { "" } else { " (optional)" };
        println!(
            "  {:<24} {} {}{}",
            catalog.name_of(&req.ingredient),
            req.amount,
            req.unit,
            marker
        );
    }

    Ok(())
}

fn remove_recipe(output: &Output, recipe: &str) -> Result<()> {
    let household = Household::open_current()?;
    let recipes = household.recipes()?;
    let id = find_recipe(&recipes, recipe)?.id.clone();

    let removed = household.remove_recipe(&id)?;

    output.success(&format!("Removed recipe: {} - {}", removed.id, removed.title));
    Ok(())
}

fn require(
    output: &Output,
    recipe: &str,
    ingredient: &str,
    amount: Amount,
    unit: Option<Unit>,
    optional: bool,
    replace: bool,
) -> Result<()> {
    let household = Household::open_current()?;
    let catalog = household.catalog()?;
    let mut recipes = household.recipes()?;

    let ingredient = find_ingredient(&catalog, ingredient)?;
    let recipe_id = find_recipe(&recipes, recipe)?.id.clone();
    let unit = unit.unwrap_or_else(|| household.config().household.default_unit.clone());
    let summary = format!(
        "{} {} of {}{}",
        amount,
        unit,
        ingredient.name,
        if optional { " (optional)" } else { "" }
    );

    let requirement = if optional {
        IngredientRequirement::optional(ingredient.id.clone(), amount)
    } else {
        IngredientRequirement::mandatory(ingredient.id.clone(), amount)
    }
    .with_unit(unit);

    let recipe = recipes
        .get_mut(&recipe_id)
        .ok_or_else(|| HouseholdError::RecipeNotFound(recipe_id.to_string()))?;

    if replace {
        if let Some(old) = recipe.requirements.upsert(requirement) {
            output.verbose_ctx(
                "recipe",
                &format!("Replaced previous requirement of {} {}", old.amount, old.unit),
            );
        }
    } else {
        recipe
            .requirements
            .add(requirement)
            .with_context(|| format!("Use --replace to change how much {} needs", recipe.title))?;
    }

    let title = recipe.title.clone();
    household.save_recipes(&recipes)?;

    output.success(&format!("{} now needs {}", title, summary));
    Ok(())
}

fn unrequire(output: &Output, recipe: &str, ingredient: &str) -> Result<()> {
    let household = Household::open_current()?;
    let catalog = household.catalog()?;
    let mut recipes = household.recipes()?;

    let ingredient = find_ingredient(&catalog, ingredient)?;
    let recipe_id = find_recipe(&recipes, recipe)?.id.clone();

    let recipe = recipes
        .get_mut(&recipe_id)
        .ok_or_else(|| HouseholdError::RecipeNotFound(recipe_id.to_string()))?;

    if recipe.requirements.remove(&ingredient.id).is_none() {
        anyhow::bail!("{} does not require {}", recipe.title, ingredient.name);
    }

    let title = recipe.title.clone();
    household.save_recipes(&recipes)?;

    output.success(&format!("{} no longer needs {}", title, ingredient.name));
    Ok(())
}
