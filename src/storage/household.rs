//! Household management
//!
//! Handles household initialization, gives access to the record stores and
//! keeps cross-record references consistent when something is deleted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use super::{Config, JsonlStore};
use crate::domain::{Home, HomeId, Ingredient, IngredientCatalog, IngredientId, Recipe, RecipeId};
use crate::suggest::{self, Candidate, Suggestion};

#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error("Not in a larder household. Run 'larder init' first.")]
    NotInHousehold,

    #[error("Home not found: {0}")]
    HomeNotFound(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Several recipes are titled '{title}' ({ids}); use the recipe ID instead")]
    AmbiguousRecipe { title: String, ids: String },

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Recipe ID {0} is already taken")]
    DuplicateRecipeId(RecipeId),

    #[error("Home ID {0} is already taken")]
    DuplicateHomeId(HomeId),

    #[error("No homes yet. Create one with 'larder home add <NAME>'.")]
    NoHomes,

    #[error("{0} homes exist; pick one with --home or 'larder home use <ID>'")]
    AmbiguousHome(usize),
}

/// All recipes in a household, keyed by ID
pub type RecipeMap = BTreeMap<RecipeId, Recipe>;

/// Point-in-time read of everything the suggestion engine needs for one home
#[derive(Debug, Clone)]
pub struct HomeSnapshot {
    pub home: Home,
    pub recipes: RecipeMap,
    pub catalog: IngredientCatalog,
}

impl HomeSnapshot {
    /// Runs the suggestion engine over this snapshot
    pub fn suggest(&self) -> Option<Suggestion<'_>> {
        suggest::suggest_for_home(&self.home, &self.recipes)
    }

    /// Evaluates every favourite in ranked order
    pub fn explain(&self) -> Vec<Candidate<'_>> {
        suggest::explain(self.home.favourites.iter(), &self.home.inventory, &self.recipes)
    }
}

/// A Larder household: a directory containing `.larder/`
pub struct Household {
    root: PathBuf,
    config: Config,
}

impl Household {
    /// Opens an existing household at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".larder").is_dir() {
            return Err(HouseholdError::NotInHousehold.into());
        }

        let config = Config::for_household(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the household at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_household_root().ok_or(HouseholdError::NotInHousehold)?;

        Self::open(root)
    }

    /// Initializes a new household at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let larder_dir = root.join(".larder");

        fs::create_dir_all(&larder_dir).with_context(|| {
            format!("Failed to create .larder directory: {}", larder_dir.display())
        })?;

        let config_path = larder_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Larder configuration

# Home used when --home is not given (set with 'larder home use <ID>')
# default_home = "h-0000000"

# Unit assumed when a command doesn't name one
default_unit = "g"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = larder_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Ignore interrupted writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the household root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .larder directory path
    pub fn larder_dir(&self) -> PathBuf {
        self.root.join(".larder")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn ingredient_store(&self) -> JsonlStore<Ingredient> {
        JsonlStore::new(self.larder_dir().join("ingredients.jsonl"))
    }

    pub fn recipe_store(&self) -> JsonlStore<Recipe> {
        JsonlStore::new(self.larder_dir().join("recipes.jsonl"))
    }

    pub fn home_store(&self) -> JsonlStore<Home> {
        JsonlStore::new(self.larder_dir().join("homes.jsonl"))
    }

    /// Loads the ingredient catalog, failing on duplicate names
    pub fn catalog(&self) -> Result<IngredientCatalog> {
        let ingredients = self.ingredient_store().read_all()?;
        IngredientCatalog::from_ingredients(ingredients).context("Ingredient store is inconsistent")
    }

    pub fn save_catalog(&self, catalog: &IngredientCatalog) -> Result<()> {
        self.ingredient_store().write_all(catalog.iter())
    }

    /// Loads every recipe keyed by ID
    pub fn recipes(&self) -> Result<RecipeMap> {
        let mut book = RecipeMap::new();
        for recipe in self.recipe_store().read_all()? {
            if book.contains_key(&recipe.id) {
                anyhow::bail!("Recipe store is inconsistent: duplicate recipe {}", recipe.id);
            }
            book.insert(recipe.id.clone(), recipe);
        }
        Ok(book)
    }

    pub fn save_recipes(&self, recipes: &RecipeMap) -> Result<()> {
        self.recipe_store().write_all(recipes.values())
    }

    /// Loads every home keyed by ID
    pub fn homes(&self) -> Result<BTreeMap<HomeId, Home>> {
        let mut homes = BTreeMap::new();
        for home in self.home_store().read_all()? {
            if homes.contains_key(&home.id) {
                anyhow::bail!("Home store is inconsistent: duplicate home {}", home.id);
            }
            homes.insert(home.id.clone(), home);
        }
        Ok(homes)
    }

    pub fn save_homes(&self, homes: &BTreeMap<HomeId, Home>) -> Result<()> {
        self.home_store().write_all(homes.values())
    }

    /// Stores a new recipe, refusing to replace an existing one
    pub fn add_recipe(&self, recipe: Recipe) -> Result<()> {
        let mut recipes = self.recipes()?;
        if recipes.contains_key(&recipe.id) {
            return Err(HouseholdError::DuplicateRecipeId(recipe.id).into());
        }

        recipes.insert(recipe.id.clone(), recipe);
        self.save_recipes(&recipes)
    }

    /// Stores a new home and returns how many homes there are now
    pub fn add_home(&self, home: Home) -> Result<usize> {
        let mut homes = self.homes()?;
        if homes.contains_key(&home.id) {
            return Err(HouseholdError::DuplicateHomeId(home.id).into());
        }

        homes.insert(home.id.clone(), home);
        self.save_homes(&homes)?;
        Ok(homes.len())
    }

    /// Loads all homes, applies `f` to one of them and saves the result
    ///
    /// Nothing is written when `f` fails.
    pub fn update_home<T>(
        &self,
        home_id: &HomeId,
        f: impl FnOnce(&mut Home) -> Result<T>,
    ) -> Result<T> {
        let mut homes = self.homes()?;
        let home = homes
            .get_mut(home_id)
            .ok_or_else(|| HouseholdError::HomeNotFound(home_id.to_string()))?;

        let result = f(home)?;
        self.save_homes(&homes)?;
        Ok(result)
    }

    /// Picks the home a command acts on
    ///
    /// An explicit ID wins, then the configured default, then the only home
    /// if there is exactly one.
    pub fn resolve_home(&self, explicit: Option<&str>) -> Result<HomeId> {
        let homes = self.homes()?;

        if let Some(raw) = explicit {
            let id: HomeId = raw.parse()?;
            if !homes.contains_key(&id) {
                return Err(HouseholdError::HomeNotFound(id.to_string()).into());
            }
            return Ok(id);
        }

        if let Some(id) = &self.config.household.default_home {
            if homes.contains_key(id) {
                return Ok(id.clone());
            }
            debug!(home = %id, "Configured default home no longer exists");
        }

        let mut ids = homes.into_keys();
        match (ids.next(), ids.len()) {
            (None, _) => Err(HouseholdError::NoHomes.into()),
            (Some(id), 0) => Ok(id),
            (Some(_), rest) => Err(HouseholdError::AmbiguousHome(rest + 1).into()),
        }
    }

    /// Loads one home together with the recipes and ingredients it refers to
    pub fn snapshot(&self, home_id: &HomeId) -> Result<HomeSnapshot> {
        let mut homes = self.homes()?;
        let home = homes
            .remove(home_id)
            .ok_or_else(|| HouseholdError::HomeNotFound(home_id.to_string()))?;

        Ok(HomeSnapshot {
            home,
            recipes: self.recipes()?,
            catalog: self.catalog()?,
        })
    }

    /// Deletes a recipe and every favourite that points at it
    pub fn remove_recipe(&self, recipe_id: &RecipeId) -> Result<Recipe> {
        let mut recipes = self.recipes()?;
        let recipe = recipes
            .remove(recipe_id)
            .ok_or_else(|| HouseholdError::RecipeNotFound(recipe_id.to_string()))?;

        let mut homes = self.homes()?;
        let mut touched = 0;
        for home in homes.values_mut() {
            if home.forget_recipe(recipe_id) {
                touched += 1;
            }
        }
        debug!(recipe = %recipe_id, homes = touched, "Removed recipe from favourites");

        self.save_homes(&homes)?;
        self.save_recipes(&recipes)?;
        Ok(recipe)
    }

    /// Deletes an ingredient with its inventory entries and requirements
    pub fn remove_ingredient(&self, ingredient_id: &IngredientId) -> Result<Ingredient> {
        let mut catalog = self.catalog()?;
        let ingredient = catalog
            .remove(ingredient_id)
            .ok_or_else(|| HouseholdError::IngredientNotFound(ingredient_id.to_string()))?;

        let mut recipes = self.recipes()?;
        for recipe in recipes.values_mut() {
            recipe.requirements.remove(ingredient_id);
        }

        let mut homes = self.homes()?;
        for home in homes.values_mut() {
            home.forget_ingredient(ingredient_id);
        }

        self.save_homes(&homes)?;
        self.save_recipes(&recipes)?;
        self.save_catalog(&catalog)?;
        Ok(ingredient)
    }

    /// Deletes a home along with its inventory and favourites
    pub fn remove_home(&mut self, home_id: &HomeId) -> Result<Home> {
        let mut homes = self.homes()?;
        let home = homes
            .remove(home_id)
            .ok_or_else(|| HouseholdError::HomeNotFound(home_id.to_string()))?;
        self.save_homes(&homes)?;

        if self.config.household.default_home.as_ref() == Some(home_id) {
            self.config.household.default_home = None;
            self.config.save_household()?;
        }
        Ok(home)
    }
}

/// Looks up a recipe by ID string or by title
///
/// Titles need not be unique; a title shared by several recipes is an
/// error rather than a guess.
pub fn find_recipe<'a>(recipes: &'a RecipeMap, id_or_title: &str) -> Result<&'a Recipe> {
    if let Some(recipe) = id_or_title
        .parse::<RecipeId>()
        .ok()
        .and_then(|id| recipes.get(&id))
    {
        return Ok(recipe);
    }

    let matches: Vec<&Recipe> = recipes
        .values()
        .filter(|r| r.matches_title(id_or_title))
        .collect();

    match matches.as_slice() {
        [] => Err(HouseholdError::RecipeNotFound(id_or_title.to_string()).into()),
        [recipe] => Ok(*recipe),
        several => Err(HouseholdError::AmbiguousRecipe {
            title: id_or_title.trim().to_string(),
            ids: several
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
        .into()),
    }
}

/// Looks up an ingredient by ID string or by name
pub fn find_ingredient<'a>(catalog: &'a IngredientCatalog, id_or_name: &str) -> Result<&'a Ingredient> {
    catalog
        .resolve(id_or_name)
        .ok_or_else(|| HouseholdError::IngredientNotFound(id_or_name.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Favourite, IngredientRequirement, InventoryEntry};
    use tempfile::TempDir;

    fn amount(v: f64) -> Amount {
        Amount::new(v).unwrap()
    }

    fn setup() -> (TempDir, Household) {
        let dir = TempDir::new().unwrap();
        let household = Household::init(dir.path()).unwrap();
        (dir, household)
    }

    fn add_home(household: &Household, name: &str) -> HomeId {
        let home = Home::new(name).unwrap();
        let id = home.id.clone();
        household.add_home(home).unwrap();
        id
    }

    #[test]
    fn init_creates_structure() {
        let (_dir, household) = setup();

        assert!(household.larder_dir().is_dir());
        assert!(household.larder_dir().join("config.toml").is_file());
        assert!(household.larder_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Household::init(dir.path()).unwrap();
        Household::init(dir.path()).unwrap();

        assert!(dir.path().join(".larder").is_dir());
    }

    #[test]
    fn open_non_household_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Household::open(dir.path()).is_err());
    }

    #[test]
    fn stores_live_under_larder_dir() {
        let (_dir, household) = setup();

        assert!(household.home_store().path().ends_with(".larder/homes.jsonl"));
        assert!(household.recipe_store().path().ends_with(".larder/recipes.jsonl"));
        assert!(household.ingredient_store().path().ends_with(".larder/ingredients.jsonl"));
    }

    #[test]
    fn resolve_home_rules() {
        let (_dir, mut household) = setup();
        assert!(household.resolve_home(None).is_err());

        let first = add_home(&household, "Oakies");
        assert_eq!(household.resolve_home(None).unwrap(), first);

        let second = add_home(&household, "Cabin");
        let err = household.resolve_home(None).unwrap_err();
        assert!(err.to_string().contains("2 homes exist"));

        assert_eq!(household.resolve_home(Some(&second.to_string())).unwrap(), second);
        assert!(household.resolve_home(Some("h-fffffff")).is_err());
        assert!(household.resolve_home(Some("not-an-id")).is_err());

        household.config_mut().household.default_home = Some(first.clone());
        assert_eq!(household.resolve_home(None).unwrap(), first);
    }

    #[test]
    fn removing_recipe_cascades_to_favourites() {
        let (_dir, household) = setup();
        let home_id = add_home(&household, "Oakies");

        let recipe = Recipe::new("Poha").unwrap();
        let recipe_id = recipe.id.clone();
        household
            .save_recipes(&RecipeMap::from([(recipe_id.clone(), recipe)]))
            .unwrap();

        let mut homes = household.homes().unwrap();
        homes
            .get_mut(&home_id)
            .unwrap()
            .favourites
            .add(Favourite::new(recipe_id.clone()))
            .unwrap();
        household.save_homes(&homes).unwrap();

        household.remove_recipe(&recipe_id).unwrap();

        assert!(household.recipes().unwrap().is_empty());
        assert!(household.homes().unwrap()[&home_id].favourites.is_empty());
        assert!(household.remove_recipe(&recipe_id).is_err());
    }

    #[test]
    fn removing_ingredient_cascades() {
        let (_dir, household) = setup();
        let home_id = add_home(&household, "Oakies");

        let onion = Ingredient::new("Onion").unwrap();
        let onion_id = onion.id.clone();
        household
            .save_catalog(&IngredientCatalog::from_ingredients([onion]).unwrap())
            .unwrap();

        let recipe = Recipe::new("Poha")
            .unwrap()
            .requiring(IngredientRequirement::mandatory(onion_id.clone(), amount(250.0)))
            .unwrap();
        let recipe_id = recipe.id.clone();
        household
            .save_recipes(&RecipeMap::from([(recipe_id.clone(), recipe)]))
            .unwrap();

        let mut homes = household.homes().unwrap();
        homes
            .get_mut(&home_id)
            .unwrap()
            .inventory
            .add(InventoryEntry::new(onion_id.clone(), amount(200.0)))
            .unwrap();
        household.save_homes(&homes).unwrap();

        household.remove_ingredient(&onion_id).unwrap();

        assert!(household.catalog().unwrap().is_empty());
        assert!(household.recipes().unwrap()[&recipe_id].requirements.is_empty());
        assert!(household.homes().unwrap()[&home_id].inventory.is_empty());
    }

    #[test]
    fn failed_update_writes_nothing() {
        let (_dir, household) = setup();
        let home_id = add_home(&household, "Oakies");

        let result: Result<()> = household.update_home(&home_id, |home| {
            home.rename("Renamed")?;
            anyhow::bail!("abort")
        });
        assert!(result.is_err());
        assert_eq!(household.homes().unwrap()[&home_id].name, "Oakies");

        household
            .update_home(&home_id, |home| Ok(home.rename("Renamed")?))
            .unwrap();
        assert_eq!(household.homes().unwrap()[&home_id].name, "Renamed");
    }

    #[test]
    fn removing_default_home_clears_config() {
        let (_dir, mut household) = setup();
        let home_id = add_home(&household, "Oakies");
        household.config_mut().household.default_home = Some(home_id.clone());
        household.config().save_household().unwrap();

        household.remove_home(&home_id).unwrap();

        let reopened = Household::open(household.root()).unwrap();
        assert!(reopened.config().household.default_home.is_none());
        assert!(reopened.homes().unwrap().is_empty());
    }

    #[test]
    fn snapshot_feeds_the_engine() {
        let (_dir, household) = setup();
        let home_id = add_home(&household, "Oakies");

        let butter = Ingredient::new("Butter").unwrap();
        let butter_id = butter.id.clone();
        household
            .save_catalog(&IngredientCatalog::from_ingredients([butter]).unwrap())
            .unwrap();

        let toast = Recipe::new("Toast")
            .unwrap()
            .requiring(IngredientRequirement::mandatory(butter_id.clone(), amount(10.0)))
            .unwrap();
        let toast_id = toast.id.clone();
        household
            .save_recipes(&RecipeMap::from([(toast_id.clone(), toast)]))
            .unwrap();

        let mut homes = household.homes().unwrap();
        let home = homes.get_mut(&home_id).unwrap();
        home.favourites.add(Favourite::new(toast_id.clone())).unwrap();
        household.save_homes(&homes).unwrap();

        let snapshot = household.snapshot(&home_id).unwrap();
        assert!(snapshot.suggest().is_none());
        assert_eq!(snapshot.explain().len(), 1);

        let mut homes = household.homes().unwrap();
        homes
            .get_mut(&home_id)
            .unwrap()
            .inventory
            .add(InventoryEntry::new(butter_id, amount(50.0)))
            .unwrap();
        household.save_homes(&homes).unwrap();

        let snapshot = household.snapshot(&home_id).unwrap();
        assert_eq!(snapshot.suggest().unwrap().recipe.id, toast_id);
    }

    #[test]
    fn find_by_title_or_id() {
        let recipe = Recipe::new("Butter Paneer").unwrap();
        let id = recipe.id.clone();
        let book = RecipeMap::from([(id.clone(), recipe)]);

        assert_eq!(find_recipe(&book, "butter paneer").unwrap().id, id);
        assert_eq!(find_recipe(&book, &id.to_string()).unwrap().id, id);
        assert!(find_recipe(&book, "Poha").is_err());
    }

    #[test]
    fn shared_title_is_ambiguous() {
        let mut first = Recipe::new("Poha").unwrap();
        first.id = "r-0000001".parse().unwrap();
        let mut second = Recipe::new("poha").unwrap();
        second.id = "r-0000002".parse().unwrap();
        let book = RecipeMap::from([
            (first.id.clone(), first.clone()),
            (second.id.clone(), second.clone()),
        ]);

        let err = find_recipe(&book, "Poha").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Several recipes are titled 'Poha'"));
        assert!(message.contains("r-0000001, r-0000002"));

        assert_eq!(find_recipe(&book, "r-0000002").unwrap().id, second.id);
    }

    #[test]
    fn adding_recipe_never_overwrites() {
        let (_dir, household) = setup();
        let recipe = Recipe::new("Poha").unwrap();
        household.add_recipe(recipe.clone()).unwrap();

        let mut clash = Recipe::new("Upma").unwrap();
        clash.id = recipe.id.clone();
        let err = household.add_recipe(clash).unwrap_err();
        assert!(err.to_string().contains("already taken"));

        assert_eq!(household.recipes().unwrap()[&recipe.id].title, "Poha");
    }

    #[test]
    fn adding_home_never_overwrites() {
        let (_dir, household) = setup();
        let home = Home::new("Oakies").unwrap();
        assert_eq!(household.add_home(home.clone()).unwrap(), 1);

        let mut clash = Home::new("Cabin").unwrap();
        clash.id = home.id.clone();
        assert!(household.add_home(clash).is_err());

        assert_eq!(household.homes().unwrap()[&home.id].name, "Oakies");
    }
}
