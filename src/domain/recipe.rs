//! Recipe domain model
//!
//! A recipe owns its ingredient requirements. Each requirement is either
//! mandatory (the recipe can't be cooked without it) or optional (advisory
//! only, never blocks a suggestion).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::amount::{validate_name, Amount, Unit, ValueError};
use super::id::{IngredientId, RecipeId};

#[derive(Debug, Error, PartialEq)]
pub enum RecipeError {
    #[error("Recipe already requires ingredient {0}")]
    DuplicateRequirement(IngredientId),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// How much of an ingredient a recipe needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub ingredient: IngredientId,
    pub amount: Amount,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

impl IngredientRequirement {
    /// Creates a mandatory requirement in the default unit
    pub fn mandatory(ingredient: IngredientId, amount: Amount) -> Self {
        Self {
            ingredient,
            amount,
            unit: Unit::default(),
            mandatory: true,
        }
    }

    /// Creates an optional requirement in the default unit
    pub fn optional(ingredient: IngredientId, amount: Amount) -> Self {
        Self {
            mandatory: false,
            ..Self::mandatory(ingredient, amount)
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

/// A recipe's requirements, at most one per ingredient
///
/// Insertion order is preserved. Deserialization rejects duplicate
/// ingredients so a hand-edited file can't break the invariant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<IngredientRequirement>")]
pub struct Requirements(Vec<IngredientRequirement>);

impl Requirements {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a requirement, rejecting a second one for the same ingredient
    pub fn add(&mut self, requirement: IngredientRequirement) -> Result<(), RecipeError> {
        if self.contains(&requirement.ingredient) {
            return Err(RecipeError::DuplicateRequirement(requirement.ingredient));
        }
        self.0.push(requirement);
        Ok(())
    }

    /// Adds or replaces the requirement for an ingredient
    ///
    /// Returns the replaced requirement, if any.
    pub fn upsert(&mut self, requirement: IngredientRequirement) -> Option<IngredientRequirement> {
        match self
            .0
            .iter_mut()
            .find(|r| r.ingredient == requirement.ingredient)
        {
            Some(existing) => Some(std::mem::replace(existing, requirement)),
            None => {
                self.0.push(requirement);
                None
            }
        }
    }

    /// Removes the requirement for an ingredient
    pub fn remove(&mut self, ingredient: &IngredientId) -> Option<IngredientRequirement> {
        let idx = self.0.iter().position(|r| &r.ingredient == ingredient)?;
        Some(self.0.remove(idx))
    }

    pub fn get(&self, ingredient: &IngredientId) -> Option<&IngredientRequirement> {
        self.0.iter().find(|r| &r.ingredient == ingredient)
    }

    pub fn contains(&self, ingredient: &IngredientId) -> bool {
        self.get(ingredient).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IngredientRequirement> {
        self.0.iter()
    }

    /// Returns only the requirements that gate feasibility
    pub fn mandatory(&self) -> impl Iterator<Item = &IngredientRequirement> {
        self.0.iter().filter(|r| r.mandatory)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<IngredientRequirement>> for Requirements {
    type Error = RecipeError;

    fn try_from(requirements: Vec<IngredientRequirement>) -> Result<Self, Self::Error> {
        let mut result = Self::new();
        for requirement in requirements {
            result.add(requirement)?;
        }
        Ok(result)
    }
}

impl Serialize for Requirements {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Requirements {
    type Item = &'a IngredientRequirement;
    type IntoIter = std::slice::Iter<'a, IngredientRequirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A recipe in the household's catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub requirements: Requirements,

    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a new recipe with no requirements
    pub fn new(title: &str) -> Result<Self, ValueError> {
        let title = validate_name(title)?;
        let now = Utc::now();

        Ok(Self {
            id: RecipeId::new(&title, now),
            title,
            description: String::new(),
            time_minutes: None,
            link: None,
            tags: Vec::new(),
            requirements: Requirements::new(),
            created_at: now,
        })
    }

    /// Builder-style helper for adding a requirement
    pub fn requiring(mut self, requirement: IngredientRequirement) -> Result<Self, RecipeError> {
        self.requirements.add(requirement)?;
        Ok(self)
    }

    /// Adds a tag, ignoring blanks and case-insensitive duplicates
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Returns true if `title` refers to this recipe (case-insensitive)
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title.trim())
    }
}
