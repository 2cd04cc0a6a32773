//! Larder - A local-first kitchen manager
//!
//! Larder keeps each home's ingredient stock and favourite recipes in a
//! `.larder/` directory and suggests what to cook next: the least recently
//! cooked favourite whose mandatory ingredients are all on hand.

pub mod domain;
pub mod suggest;
pub mod storage;
pub mod cli;

pub use domain::{Favourite, Home, HomeId, Ingredient, IngredientId, Inventory, Recipe, RecipeId};
pub use suggest::{suggest, Feasibility, Suggestion};
