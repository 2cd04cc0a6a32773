//! Ingredient domain model
//!
//! Ingredients are shared by identity between inventory entries and recipe
//! requirements. Names are unique within a household, ignoring case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::amount::{validate_name, ValueError};
use super::id::IngredientId;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("An ingredient named '{0}' already exists")]
    DuplicateName(String),

    #[error("Duplicate ingredient ID: {0}")]
    DuplicateId(IngredientId),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// An ingredient that can be stocked and required by recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// Creates a new ingredient with a fresh ID
    pub fn new(name: &str) -> Result<Self, ValueError> {
        let name = validate_name(name)?;
        let now = Utc::now();

        Ok(Self {
            id: IngredientId::new(&name, now),
            name,
            created_at: now,
        })
    }

    /// Returns true if `name` refers to this ingredient (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// All ingredients known to a household, keyed by ID
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    ingredients: BTreeMap<IngredientId, Ingredient>,
}

impl IngredientCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate IDs and names
    pub fn from_ingredients(
        ingredients: impl IntoIterator<Item = Ingredient>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for ingredient in ingredients {
            catalog.add(ingredient)?;
        }
        Ok(catalog)
    }

    /// Adds an ingredient
    pub fn add(&mut self, ingredient: Ingredient) -> Result<(), CatalogError> {
        if self.ingredients.contains_key(&ingredient.id) {
            return Err(CatalogError::DuplicateId(ingredient.id));
        }
        if self.find_by_name(&ingredient.name).is_some() {
            return Err(CatalogError::DuplicateName(ingredient.name));
        }

        self.ingredients.insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    /// Removes an ingredient, returning it if it existed
    pub fn remove(&mut self, id: &IngredientId) -> Option<Ingredient> {
        self.ingredients.remove(id)
    }

    pub fn get(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.values().find(|i| i.matches_name(name))
    }

    /// Looks up an ingredient by ID string or by name
    pub fn resolve(&self, id_or_name: &str) -> Option<&Ingredient> {
        id_or_name
            .parse::<IngredientId>()
            .ok()
            .and_then(|id| self.get(&id))
            .or_else(|| self.find_by_name(id_or_name))
    }

    /// Returns the display name for an ID, or the ID itself when unknown
    pub fn name_of(&self, id: &IngredientId) -> String {
        self.get(id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}
