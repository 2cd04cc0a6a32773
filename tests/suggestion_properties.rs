//! Property tests for the suggestion engine.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use larder_cli::domain::{
    Amount, Favourite, IngredientId, IngredientRequirement, Inventory, InventoryEntry, Recipe,
    RecipeId,
};
use larder_cli::suggest::{check, explain, rank, suggest};

const INGREDIENTS: u32 = 4;

fn ingredient(n: u32) -> IngredientId {
    format!("i-{:07x}", n).parse().unwrap()
}

fn recipe_id(n: usize) -> RecipeId {
    format!("r-{:07x}", n).parse().unwrap()
}

fn day(offset: u16) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap()
}

/// One favourite: when it was last cooked and what its recipe needs
type FavouriteSpec = (Option<u16>, Vec<(u32, u32, bool)>);

fn favourite_spec() -> impl Strategy<Value = FavouriteSpec> {
    (
        prop::option::of(0u16..60),
        prop::collection::vec((0..INGREDIENTS, 0u32..500, any::<bool>()), 0..4),
    )
}

fn inventory_spec() -> impl Strategy<Value = Vec<Option<u32>>> {
    prop::collection::vec(prop::option::of(0u32..500), INGREDIENTS as usize)
}

fn build_inventory(spec: &[Option<u32>]) -> Inventory {
    let mut inventory = Inventory::new();
    for (n, quantity) in spec.iter().enumerate() {
        if let Some(q) = quantity {
            let entry = InventoryEntry::new(ingredient(n as u32), Amount::new(f64::from(*q)).unwrap());
            inventory.add(entry).unwrap();
        }
    }
    inventory
}

fn build_household(specs: &[FavouriteSpec]) -> (Vec<Favourite>, BTreeMap<RecipeId, Recipe>) {
    let mut favourites = Vec::new();
    let mut recipes = BTreeMap::new();

    for (n, (cooked, requirements)) in specs.iter().enumerate() {
        let id = recipe_id(n);
        let mut recipe = Recipe::new(&format!("Recipe {}", n)).unwrap();
        recipe.id = id.clone();
        for (ing, amount, mandatory) in requirements {
            let amount = Amount::new(f64::from(*amount)).unwrap();
            let req = if *mandatory {
                IngredientRequirement::mandatory(ingredient(*ing), amount)
            } else {
                IngredientRequirement::optional(ingredient(*ing), amount)
            };
            recipe.requirements.upsert(req);
        }
        recipes.insert(id.clone(), recipe);

        let favourite = match cooked {
            Some(offset) => Favourite::new(id).cooked_on(day(*offset)),
            None => Favourite::new(id),
        };
        favourites.push(favourite);
    }

    (favourites, recipes)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Ranking puts never-cooked first, then ascending dates, ties by recipe ID.
    #[test]
    fn property_rank_orders_by_recency(
        specs in prop::collection::vec(favourite_spec(), 0..10),
    ) {
        let (favourites, _) = build_household(&specs);
        let ranked = rank(&favourites);

        prop_assert_eq!(ranked.len(), favourites.len());
        for pair in ranked.windows(2) {
            let earlier = (pair[0].last_cooked, &pair[0].recipe);
            let later = (pair[1].last_cooked, &pair[1].recipe);
            prop_assert!(earlier < later);
        }
    }

    /// PROPERTY: Ranking does not depend on the order favourites are stored in.
    #[test]
    fn property_rank_ignores_input_order(
        specs in prop::collection::vec(favourite_spec(), 0..10),
    ) {
        let (favourites, _) = build_household(&specs);
        let reversed: Vec<Favourite> = favourites.iter().rev().cloned().collect();

        let forward: Vec<&RecipeId> = rank(&favourites).into_iter().map(|f| &f.recipe).collect();
        let backward: Vec<&RecipeId> = rank(&reversed).into_iter().map(|f| &f.recipe).collect();
        prop_assert_eq!(forward, backward);
    }

    /// PROPERTY: The suggestion is the first feasible favourite in ranked order.
    #[test]
    fn property_suggestion_is_first_feasible(
        specs in prop::collection::vec(favourite_spec(), 0..8),
        stock in inventory_spec(),
    ) {
        let (favourites, recipes) = build_household(&specs);
        let inventory = build_inventory(&stock);

        let candidates = explain(&favourites, &inventory, &recipes);
        let expected = candidates
            .iter()
            .find(|c| c.is_feasible())
            .map(|c| c.favourite.recipe.clone());

        let picked = suggest(&favourites, &inventory, &recipes).map(|s| s.recipe.id.clone());
        prop_assert_eq!(picked, expected);
    }

    /// PROPERTY: More stock never makes a feasible recipe infeasible.
    #[test]
    fn property_feasibility_is_monotonic(
        spec in favourite_spec(),
        stock in inventory_spec(),
        extra in prop::collection::vec(0u32..300, INGREDIENTS as usize),
    ) {
        let (_, recipes) = build_household(&[spec]);
        let recipe = recipes.values().next().unwrap();

        let inventory = build_inventory(&stock);
        let richer: Vec<Option<u32>> = stock
            .iter()
            .zip(&extra)
            .map(|(q, e)| Some(q.unwrap_or(0) + e))
            .collect();
        let richer = build_inventory(&richer);

        if check(&recipe.requirements, &inventory).is_feasible() {
            prop_assert!(check(&recipe.requirements, &richer).is_feasible());
        }
    }

    /// PROPERTY: Optional requirements never affect the verdict.
    #[test]
    fn property_optional_requirements_are_ignored(
        spec in favourite_spec(),
        stock in inventory_spec(),
    ) {
        let (_, recipes) = build_household(&[spec]);
        let recipe = recipes.values().next().unwrap();
        let inventory = build_inventory(&stock);

        let all = check(&recipe.requirements, &inventory);
        let mandatory_only = check(recipe.requirements.mandatory(), &inventory);
        prop_assert_eq!(all, mandatory_only);
    }

    /// PROPERTY: A recipe with no mandatory requirements is feasible in an empty home.
    #[test]
    fn property_no_mandatory_requirements_always_feasible(
        optional in prop::collection::vec((0..INGREDIENTS, 0u32..500), 0..4),
    ) {
        let spec: FavouriteSpec = (None, optional.into_iter().map(|(i, a)| (i, a, false)).collect());
        let (favourites, recipes) = build_household(&[spec]);

        let picked = suggest(&favourites, &Inventory::new(), &recipes);
        prop_assert_eq!(picked.map(|s| s.recipe.id.clone()), Some(recipe_id(0)));
    }
}

#[test]
fn empty_favourites_suggest_nothing() {
    let favourites: Vec<Favourite> = Vec::new();
    let recipes: BTreeMap<RecipeId, Recipe> = BTreeMap::new();

    assert!(suggest(&favourites, &Inventory::new(), &recipes).is_none());
}
