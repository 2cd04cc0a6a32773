//! Home domain model
//!
//! A home owns its ingredient inventory and its list of favourite recipes.
//! Both collections enforce one row per key: at most one inventory entry per
//! ingredient and at most one favourite per recipe.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

use super::amount::{validate_name, Amount, Rating, Unit, ValueError};
use super::id::{HomeId, IngredientId, RecipeId};
use super::recipe::IngredientRequirement;

#[derive(Debug, Error, PartialEq)]
pub enum HomeError {
    #[error("Inventory already has an entry for ingredient {0}")]
    DuplicateInventoryEntry(IngredientId),

    #[error("Recipe {0} is already a favourite")]
    DuplicateFavourite(RecipeId),

    #[error("Ingredient {0} is not in the inventory")]
    NotStocked(IngredientId),

    #[error("Recipe {0} is not a favourite")]
    FavouriteNotFound(RecipeId),

    #[error("Not enough of ingredient {ingredient}: need {required}, have {available}")]
    InsufficientStock {
        ingredient: IngredientId,
        required: Amount,
        available: Amount,
    },

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Quantity of one ingredient on hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub ingredient: IngredientId,
    pub quantity: Amount,
    #[serde(default)]
    pub unit: Unit,
}

impl InventoryEntry {
    pub fn new(ingredient: IngredientId, quantity: Amount) -> Self {
        Self {
            ingredient,
            quantity,
            unit: Unit::default(),
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

/// A home's stock, keyed by ingredient
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<InventoryEntry>")]
pub struct Inventory {
    entries: BTreeMap<IngredientId, InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, rejecting a second one for the same ingredient
    pub fn add(&mut self, entry: InventoryEntry) -> Result<(), HomeError> {
        if self.entries.contains_key(&entry.ingredient) {
            return Err(HomeError::DuplicateInventoryEntry(entry.ingredient));
        }
        self.entries.insert(entry.ingredient.clone(), entry);
        Ok(())
    }

    /// Adds or replaces the entry for an ingredient
    pub fn set(&mut self, entry: InventoryEntry) -> Option<InventoryEntry> {
        self.entries.insert(entry.ingredient.clone(), entry)
    }

    /// Adds a signed delta to a stocked ingredient and returns the new quantity
    ///
    /// The entry is left untouched when the result would be negative.
    pub fn adjust(&mut self, ingredient: &IngredientId, delta: f64) -> Result<Amount, HomeError> {
        let entry = self
            .entries
            .get_mut(ingredient)
            .ok_or_else(|| HomeError::NotStocked(ingredient.clone()))?;

        entry.quantity = entry.quantity.adjusted(delta)?;
        Ok(entry.quantity)
    }

    /// Deducts every requirement from stock, all or nothing
    pub fn consume<'a>(
        &mut self,
        requirements: impl IntoIterator<Item = &'a IngredientRequirement>,
    ) -> Result<(), HomeError> {
        let mut updated = Vec::new();

        for req in requirements {
            let available = self.quantity(&req.ingredient).unwrap_or(Amount::ZERO);
            let remaining = available
                .checked_sub(req.amount)
                .ok_or_else(|| HomeError::InsufficientStock {
                    ingredient: req.ingredient.clone(),
                    required: req.amount,
                    available,
                })?;
            updated.push((req.ingredient.clone(), remaining));
        }

        for (ingredient, remaining) in updated {
            if let Some(entry) = self.entries.get_mut(&ingredient) {
                entry.quantity = remaining;
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, ingredient: &IngredientId) -> Option<InventoryEntry> {
        self.entries.remove(ingredient)
    }

    pub fn get(&self, ingredient: &IngredientId) -> Option<&InventoryEntry> {
        self.entries.get(ingredient)
    }

    /// Returns the quantity on hand, or None if the ingredient isn't stocked
    pub fn quantity(&self, ingredient: &IngredientId) -> Option<Amount> {
        self.entries.get(ingredient).map(|e| e.quantity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<InventoryEntry>> for Inventory {
    type Error = HomeError;

    fn try_from(entries: Vec<InventoryEntry>) -> Result<Self, Self::Error> {
        let mut inventory = Self::new();
        for entry in entries {
            inventory.add(entry)?;
        }
        Ok(inventory)
    }
}

impl Serialize for Inventory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.entries.values())
    }
}

/// A recipe a home likes to cook, with its cook history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub recipe: RecipeId,

    /// None until the recipe is cooked for the first time
    #[serde(default)]
    pub last_cooked: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Favourite {
    /// Creates a never-cooked, unrated favourite
    pub fn new(recipe: RecipeId) -> Self {
        Self {
            recipe,
            last_cooked: None,
            rating: None,
        }
    }

    pub fn cooked_on(mut self, date: NaiveDate) -> Self {
        self.last_cooked = Some(date);
        self
    }

    pub fn rated(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn is_never_cooked(&self) -> bool {
        self.last_cooked.is_none()
    }
}

/// A home's favourite recipes, at most one per recipe
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Favourite>")]
pub struct Favourites(Vec<Favourite>);

impl Favourites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a recipe as favourite
    pub fn add(&mut self, favourite: Favourite) -> Result<(), HomeError> {
        if self.contains(&favourite.recipe) {
            return Err(HomeError::DuplicateFavourite(favourite.recipe));
        }
        self.0.push(favourite);
        Ok(())
    }

    /// Records that a favourite was cooked on `date`
    pub fn record_cooked(&mut self, recipe: &RecipeId, date: NaiveDate) -> Result<&Favourite, HomeError> {
        let favourite = self.get_mut(recipe)?;
        favourite.last_cooked = Some(date);
        Ok(favourite)
    }

    /// Sets or clears a favourite's rating
    pub fn rate(&mut self, recipe: &RecipeId, rating: Option<Rating>) -> Result<&Favourite, HomeError> {
        let favourite = self.get_mut(recipe)?;
        favourite.rating = rating;
        Ok(favourite)
    }

    pub fn remove(&mut self, recipe: &RecipeId) -> Option<Favourite> {
        let idx = self.0.iter().position(|f| &f.recipe == recipe)?;
        Some(self.0.remove(idx))
    }

    pub fn get(&self, recipe: &RecipeId) -> Option<&Favourite> {
        self.0.iter().find(|f| &f.recipe == recipe)
    }

    fn get_mut(&mut self, recipe: &RecipeId) -> Result<&mut Favourite, HomeError> {
        self.0
            .iter_mut()
            .find(|f| &f.recipe == recipe)
            .ok_or_else(|| HomeError::FavouriteNotFound(recipe.clone()))
    }

    pub fn contains(&self, recipe: &RecipeId) -> bool {
        self.get(recipe).is_some()
    }

    pub fn as_slice(&self) -> &[Favourite] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Favourite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Favourite>> for Favourites {
    type Error = HomeError;

    fn try_from(favourites: Vec<Favourite>) -> Result<Self, Self::Error> {
        let mut result = Self::new();
        for favourite in favourites {
            result.add(favourite)?;
        }
        Ok(result)
    }
}

impl Serialize for Favourites {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// A household member group with its own stock and favourites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub inventory: Inventory,

    #[serde(default)]
    pub favourites: Favourites,
}

impl Home {
    /// Creates an empty home with a fresh ID
    pub fn new(name: &str) -> Result<Self, ValueError> {
        let name = validate_name(name)?;
        let now = Utc::now();

        Ok(Self {
            id: HomeId::new(&name, now),
            name,
            created_at: now,
            inventory: Inventory::new(),
            favourites: Favourites::new(),
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValueError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    /// Drops everything that references a deleted recipe
    pub fn forget_recipe(&mut self, recipe: &RecipeId) -> bool {
        self.favourites.remove(recipe).is_some()
    }

    /// Drops everything that references a deleted ingredient
    pub fn forget_ingredient(&mut self, ingredient: &IngredientId) -> bool {
        self.inventory.remove(ingredient).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(n: u32) -> IngredientId {
        format!("i-{:07x}", n).parse().unwrap()
    }

    fn recipe(n: u32) -> RecipeId {
        format!("r-{:07x}", n).parse().unwrap()
    }

    fn amount(v: f64) -> Amount {
        Amount::new(v).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn duplicate_inventory_entry_rejected() {
        let mut inventory = Inventory::new();
        inventory
            .add(InventoryEntry::new(ingredient(1), amount(200.0)))
            .unwrap();

        let result = inventory.add(InventoryEntry::new(ingredient(1), amount(50.0)));
        assert_eq!(result, Err(HomeError::DuplicateInventoryEntry(ingredient(1))));
        assert_eq!(inventory.quantity(&ingredient(1)), Some(amount(200.0)));
    }

    #[test]
    fn set_replaces_entry() {
        let mut inventory = Inventory::new();
        inventory.set(InventoryEntry::new(ingredient(1), amount(200.0)));
        let old = inventory.set(InventoryEntry::new(ingredient(1), amount(50.0)));

        assert_eq!(old.unwrap().quantity, amount(200.0));
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.quantity(&ingredient(1)), Some(amount(50.0)));
    }

    #[test]
    fn adjust_rejects_negative_result() {
        let mut inventory = Inventory::new();
        inventory.set(InventoryEntry::new(ingredient(1), amount(100.0)));

        assert_eq!(inventory.adjust(&ingredient(1), -40.0).unwrap(), amount(60.0));
        assert!(matches!(
            inventory.adjust(&ingredient(1), -61.0),
            Err(HomeError::Value(ValueError::InvalidAmount(_)))
        ));
        assert_eq!(inventory.quantity(&ingredient(1)), Some(amount(60.0)));
        assert_eq!(
            inventory.adjust(&ingredient(2), 1.0),
            Err(HomeError::NotStocked(ingredient(2)))
        );
    }

    #[test]
    fn consume_is_all_or_nothing() {
        let mut inventory = Inventory::new();
        inventory.set(InventoryEntry::new(ingredient(1), amount(200.0)));
        inventory.set(InventoryEntry::new(ingredient(2), amount(100.0)));

        let reqs = [
            IngredientRequirement::mandatory(ingredient(1), amount(150.0)),
            IngredientRequirement::mandatory(ingredient(2), amount(150.0)),
        ];

        let result = inventory.consume(&reqs);
        assert!(matches!(result, Err(HomeError::InsufficientStock { .. })));
        assert_eq!(inventory.quantity(&ingredient(1)), Some(amount(200.0)));

        inventory.consume(&reqs[..1]).unwrap();
        assert_eq!(inventory.quantity(&ingredient(1)), Some(amount(50.0)));
    }

    #[test]
    fn consume_missing_ingredient_fails() {
        let mut inventory = Inventory::new();
        let reqs = [IngredientRequirement::mandatory(ingredient(9), amount(1.0))];

        assert_eq!(
            inventory.consume(&reqs),
            Err(HomeError::InsufficientStock {
                ingredient: ingredient(9),
                required: amount(1.0),
                available: Amount::ZERO,
            })
        );
    }

    #[test]
    fn inventory_deserialize_rejects_duplicates() {
        let json = r#"[
            {"ingredient": "i-0000001", "quantity": 1},
            {"ingredient": "i-0000001", "quantity": 2}
        ]"#;
        assert!(serde_json::from_str::<Inventory>(json).is_err());
    }

    #[test]
    fn inventory_deserialize_rejects_negative_quantity() {
        let json = r#"[{"ingredient": "i-0000001", "quantity": -1}]"#;
        assert!(serde_json::from_str::<Inventory>(json).is_err());
    }

    #[test]
    fn duplicate_favourite_rejected() {
        let mut favourites = Favourites::new();
        favourites.add(Favourite::new(recipe(1))).unwrap();

        assert_eq!(
            favourites.add(Favourite::new(recipe(1)).cooked_on(date("2024-09-02"))),
            Err(HomeError::DuplicateFavourite(recipe(1)))
        );
    }

    #[test]
    fn favourite_lifecycle() {
        let mut favourites = Favourites::new();
        favourites.add(Favourite::new(recipe(1))).unwrap();
        assert!(favourites.get(&recipe(1)).unwrap().is_never_cooked());

        favourites.record_cooked(&recipe(1), date("2024-09-02")).unwrap();
        let rating = Rating::new(9).unwrap();
        favourites.rate(&recipe(1), Some(rating)).unwrap();

        let fav = favourites.get(&recipe(1)).unwrap();
        assert_eq!(fav.last_cooked, Some(date("2024-09-02")));
        assert_eq!(fav.rating, Some(rating));

        favourites.rate(&recipe(1), None).unwrap();
        assert_eq!(favourites.get(&recipe(1)).unwrap().rating, None);

        assert!(favourites.remove(&recipe(1)).is_some());
        assert_eq!(
            favourites.record_cooked(&recipe(1), date("2024-09-03")).unwrap_err(),
            HomeError::FavouriteNotFound(recipe(1))
        );
    }

    #[test]
    fn forget_cascades() {
        let mut home = Home::new("Oakies").unwrap();
        home.inventory
            .set(InventoryEntry::new(ingredient(1), amount(1.0)));
        home.favourites.add(Favourite::new(recipe(1))).unwrap();

        assert!(home.forget_recipe(&recipe(1)));
        assert!(home.forget_ingredient(&ingredient(1)));
        assert!(home.favourites.is_empty());
        assert!(home.inventory.is_empty());
        assert!(!home.forget_recipe(&recipe(1)));
    }

    #[test]
    fn home_round_trip() {
        let mut home = Home::new("Oakies").unwrap();
        home.inventory
            .set(InventoryEntry::new(ingredient(1), amount(200.0)).with_unit(Unit::new("ml").unwrap()));
        home.favourites
            .add(Favourite::new(recipe(1)).rated(Rating::new(5).unwrap()))
            .unwrap();

        let json = serde_json::to_string(&home).unwrap();
        let back: Home = serde_json::from_str(&json).unwrap();
        assert_eq!(back, home);
    }
}
