//! # Storage Layer
//!
//! Persistence layer for Larder with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Ingredients | JSONL (one JSON per line) | `.larder/ingredients.jsonl` |
//! | Recipes + requirements | JSONL | `.larder/recipes.jsonl` |
//! | Homes + inventory + favourites | JSONL | `.larder/homes.jsonl` |
//! | Config | TOML | `.larder/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`JsonlStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Household`] - Entry point for accessing a Larder household
//! - [`HomeSnapshot`] - Immutable input to the suggestion engine
//! - [`Config`] - Household and global configuration

mod jsonl;
mod config;
mod household;

pub use jsonl::{JsonlStore, Record};
pub use config::{Config, ConfigError, GlobalConfig, HouseholdConfig, OutputFormat};
pub use household::{
    find_ingredient, find_recipe, HomeSnapshot, Household, HouseholdError, RecipeMap,
};
