//! Request-level suggestion pipeline.

use larder_catalog::RecipeCatalog;
use larder_units::{ConversionContext, Product};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{FeasibilityEngine, Stock};
use crate::error::SuggestionError;
use crate::recipe_set::RecipeSet;
use crate::reducer::maximal_sets;

/// A recipe in a suggested set, annotated with where it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub source: String,
}

/// Maximal feasible recipe sets for one request.
#[derive(Debug, Clone, Default)]
pub struct Suggestions {
    /// Each inner list is sorted by name; the outer list is sorted
    /// lexicographically on those names.
    pub sets: Vec<Vec<Suggestion>>,
    pub evaluated: u64,
    pub feasible: usize,
}

/// Clamp a client-supplied serving count; anything at or below one means no
/// scaling.
pub fn effective_servings(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

/// Turns a stock snapshot into maximal recipe sets.
#[derive(Debug, Clone, Copy)]
pub struct Suggester<'a> {
    context: &'a ConversionContext,
    catalog: &'a RecipeCatalog,
}

impl<'a> Suggester<'a> {
    pub fn new(context: &'a ConversionContext, catalog: &'a RecipeCatalog) -> Self {
        Self { context, catalog }
    }

    pub fn suggest<I>(&self, products: I, servings: i64) -> Result<Suggestions, SuggestionError>
    where
        I: IntoIterator<Item = Product>,
    {
        let stock = Stock::normalize(self.context, products);
        let servings = effective_servings(servings);

        let engine = FeasibilityEngine::new(self.catalog, &self.context.densities);
        let outcome = engine.search(&stock, servings);
        let maximal = maximal_sets(&outcome.feasible);

        let mut sets = maximal
            .into_iter()
            .map(|set| self.annotate(set))
            .collect::<Result<Vec<_>, _>>()?;
        sets.sort_by(|a, b| {
            a.iter()
                .map(|s| s.name.as_str())
                .cmp(b.iter().map(|s| s.name.as_str()))
        });

        info!(
            "Evaluated {} recipe sets for {} products at {} servings: {} feasible, {} maximal",
            outcome.evaluated,
            stock.len(),
            servings,
            outcome.feasible.len(),
            sets.len()
        );

        Ok(Suggestions {
            sets,
            evaluated: outcome.evaluated,
            feasible: outcome.feasible.len(),
        })
    }

    fn annotate(&self, set: RecipeSet) -> Result<Vec<Suggestion>, SuggestionError> {
        let mut suggestions = set
            .indices()
            .map(|index| -> Result<Suggestion, SuggestionError> {
                let recipe = self
                    .catalog
                    .recipe(index)
                    .ok_or(SuggestionError::UnknownRecipe(index))?;
                let source = self
                    .catalog
                    .source(&recipe.name)
                    .ok_or_else(|| SuggestionError::MissingSource(recipe.name.clone()))?;
                Ok(Suggestion {
                    name: recipe.name.clone(),
                    source: source.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        suggestions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suggestions)
    }
}
