//! Suggestion selection
//!
//! Walks a home's favourites in ranked order and picks the first one whose
//! recipe can be cooked from the current inventory. The walk is greedy and
//! single-pass: recency decides, not how much stock would be left over.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::feasibility::{self, Feasibility};
use super::ranker;
use crate::domain::{Favourite, Home, Inventory, Recipe, RecipeId};

/// Read access to recipes (and so their requirements) by ID
pub trait RecipeBook {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe>;
}

impl RecipeBook for BTreeMap<RecipeId, Recipe> {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.get(id)
    }
}

impl RecipeBook for HashMap<RecipeId, Recipe> {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.get(id)
    }
}

impl RecipeBook for [Recipe] {
    fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.iter().find(|r| &r.id == id)
    }
}

/// The recipe chosen for a home, with the favourite that nominated it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion<'a> {
    pub favourite: &'a Favourite,
    pub recipe: &'a Recipe,
}

/// One ranked favourite and what the checker made of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate<'a> {
    pub favourite: &'a Favourite,

    /// None when the favourite points at a recipe the book doesn't have
    #[serde(skip)]
    pub recipe: Option<&'a Recipe>,

    pub feasibility: Option<Feasibility>,
}

impl Candidate<'_> {
    pub fn is_feasible(&self) -> bool {
        self.feasibility.as_ref().is_some_and(Feasibility::is_feasible)
    }
}

/// Evaluates one favourite against the inventory
fn evaluate<'a, B>(favourite: &'a Favourite, inventory: &Inventory, recipes: &'a B) -> Candidate<'a>
where
    B: RecipeBook + ?Sized,
{
    let Some(recipe) = recipes.recipe(&favourite.recipe) else {
        warn!(recipe = %favourite.recipe, "Favourite refers to an unknown recipe, skipping");
        return Candidate {
            favourite,
            recipe: None,
            feasibility: None,
        };
    };

    let verdict = feasibility::check(recipe.requirements.mandatory(), inventory);
    if let Some(blocking) = verdict.blocking_ingredient() {
        debug!(recipe = %recipe.id, ingredient = %blocking, "Skipping infeasible favourite");
    }

    Candidate {
        favourite,
        recipe: Some(recipe),
        feasibility: Some(verdict),
    }
}

/// Picks the least recently cooked favourite that is feasible right now
///
/// Returns None when there are no favourites or none of them can be cooked.
pub fn suggest<'a, B>(
    favourites: impl IntoIterator<Item = &'a Favourite>,
    inventory: &Inventory,
    recipes: &'a B,
) -> Option<Suggestion<'a>>
where
    B: RecipeBook + ?Sized,
{
    let ranked = ranker::rank(favourites);
    debug!(candidates = ranked.len(), "Ranked favourites");

    let suggestion = ranked.into_iter().find_map(|favourite| {
        let candidate = evaluate(favourite, inventory, recipes);
        match candidate.recipe {
            Some(recipe) if candidate.is_feasible() => Some(Suggestion { favourite, recipe }),
            _ => None,
        }
    });

    match &suggestion {
        Some(s) => info!(recipe = %s.recipe.id, title = %s.recipe.title, "Suggested recipe"),
        None => info!("No feasible favourite"),
    }
    suggestion
}

/// Picks a recipe for a home from its own favourites and inventory
pub fn suggest_for_home<'a, B>(home: &'a Home, recipes: &'a B) -> Option<Suggestion<'a>>
where
    B: RecipeBook + ?Sized,
{
    suggest(home.favourites.iter(), &home.inventory, recipes)
}

/// Evaluates every favourite in ranked order without stopping early
///
/// The first feasible candidate in the result is the one [`suggest`] picks.
pub fn explain<'a, B>(
    favourites: impl IntoIterator<Item = &'a Favourite>,
    inventory: &Inventory,
    recipes: &'a B,
) -> Vec<Candidate<'a>>
where
    B: RecipeBook + ?Sized,
{
    ranker::rank(favourites)
        .into_iter()
        .map(|favourite| evaluate(favourite, inventory, recipes))
        .collect()
}
