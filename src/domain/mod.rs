//! Domain models for Larder
//!
//! Contains the household data types without any I/O concerns.

mod id;
mod amount;
mod ingredient;
mod recipe;
mod home;

pub use id::{HomeId, RecipeId, IngredientId, IdError};
pub use amount::{Amount, Unit, Rating, ValueError, validate_name};
pub use ingredient::{Ingredient, IngredientCatalog, CatalogError};
pub use recipe::{Recipe, IngredientRequirement, Requirements, RecipeError};
pub use home::{Home, Inventory, InventoryEntry, Favourite, Favourites, HomeError};
