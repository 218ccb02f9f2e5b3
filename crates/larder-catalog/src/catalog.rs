//! Immutable recipe catalog built once at startup.

use std::collections::{BTreeMap, HashMap};

use larder_units::{ConversionContext, Measurement, Product};
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::validation::validate_catalog;

/// Upper bound on catalog size; recipe sets are encoded as `u64` bitmasks and
/// the power set of 63 names is the widest that still fits.
pub const MAX_RECIPES: usize = 63;

/// A recipe with its normalized ingredient requirements, keyed by canonical
/// ingredient name.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub ingredients: BTreeMap<String, Measurement>,
}

/// Recipes and sources as read from disk, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub recipes: BTreeMap<String, Vec<Product>>,
    pub sources: HashMap<String, String>,
}

impl RawCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ingredient(&mut self, recipe: impl Into<String>, ingredient: Product) {
        self.recipes.entry(recipe.into()).or_default().push(ingredient);
    }

    pub fn add_source(&mut self, recipe: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(recipe.into(), source.into());
    }

    /// Every ingredient name as written in the sheets, sorted and deduplicated.
    pub fn ingredient_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .recipes
            .values()
            .flat_map(|ingredients| ingredients.iter().map(|p| p.name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// The recipe catalog. Recipes are ordered by name and that order is the
/// stable index used by recipe-set bitmasks.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
    sources: HashMap<String, String>,
}

impl RecipeCatalog {
    /// Normalize every ingredient through `ctx` and validate the result.
    pub fn build(raw: RawCatalog, ctx: &ConversionContext) -> Result<Self, CatalogError> {
        let RawCatalog { recipes, sources } = raw;

        let recipes: Vec<Recipe> = recipes
            .into_iter()
            .map(|(name, ingredients)| Recipe {
                ingredients: ctx.normalize_all(ingredients),
                name,
            })
            .collect();

        let index = recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        for recipe in sources.keys() {
            if !recipes.iter().any(|r| &r.name == recipe) {
                warn!("Source listed for unknown recipe '{}'", recipe);
            }
        }

        let catalog = Self {
            recipes,
            index,
            sources,
        };

        validate_catalog(&catalog).map_err(CatalogError::Invalid)?;

        info!(
            "Recipe catalog built with {} recipes and {} distinct ingredients",
            catalog.len(),
            catalog.ingredient_count()
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.index_of(name).and_then(|i| self.recipes.get(i))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.iter().map(|r| r.name.as_str())
    }

    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    fn ingredient_count(&self) -> usize {
        let mut names: Vec<&str> = self
            .recipes
            .iter()
            .flat_map(|r| r.ingredients.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}
