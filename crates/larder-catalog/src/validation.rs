//! Catalog integrity validation

use crate::catalog::{RecipeCatalog, MAX_RECIPES};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Recipe name cannot be empty")]
    EmptyRecipeName,

    #[error("Recipe '{0}' has no source entry")]
    MissingSource(String),

    #[error("Recipe '{0}' has no ingredients")]
    NoIngredients(String),

    #[error("Catalog has {count} recipes, at most {max} are supported")]
    TooManyRecipes { count: usize, max: usize },
}

/// Check a built catalog. Every violation is collected, not just the first.
pub fn validate_catalog(catalog: &RecipeCatalog) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if catalog.len() > MAX_RECIPES {
        errors.push(ValidationError::TooManyRecipes {
            count: catalog.len(),
            max: MAX_RECIPES,
        });
    }

    for recipe in catalog.recipes() {
        if recipe.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRecipeName);
            continue;
        }

        if recipe.ingredients.is_empty() {
            errors.push(ValidationError::NoIngredients(recipe.name.clone()));
        }

        if catalog.source(&recipe.name).is_none() {
            errors.push(ValidationError::MissingSource(recipe.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawCatalog;
    use crate::error::CatalogError;
    use larder_units::{ConversionContext, Product};

    fn build(raw: RawCatalog) -> Result<RecipeCatalog, Vec<ValidationError>> {
        match RecipeCatalog::build(raw, &ConversionContext::new()) {
            Ok(catalog) => Ok(catalog),
            Err(CatalogError::Invalid(errors)) => Err(errors),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_valid_catalog() {
        let mut raw = RawCatalog::new();
        raw.add_ingredient("toast", Product::new("bread", 2.0, "slice"));
        raw.add_source("toast", "Common knowledge");
        assert!(build(raw).is_ok());
    }

    #[test]
    fn test_empty_recipe_name() {
        let mut raw = RawCatalog::new();
        raw.add_ingredient("  ", Product::new("bread", 2.0, "slice"));
        raw.add_source("  ", "Nobody");
        let errors = build(raw).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyRecipeName)));
    }

    #[test]
    fn test_too_many_recipes() {
        let mut raw = RawCatalog::new();
        for i in 0..=MAX_RECIPES {
            let name = format!("recipe-{:02}", i);
            raw.add_ingredient(name.clone(), Product::new("water", 1.0, "ml"));
            raw.add_source(name, "generated");
        }
        let errors = build(raw).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::TooManyRecipes { count, max } if *count == MAX_RECIPES + 1 && *max == MAX_RECIPES
        )));
    }

    #[test]
    fn test_multiple_errors_accumulated() {
        let mut raw = RawCatalog::new();
        raw.add_ingredient("a", Product::new("water", 1.0, "ml"));
        raw.add_ingredient("b", Product::new("water", 1.0, "ml"));
        raw.recipes.insert("c".to_string(), Vec::new());
        let errors = build(raw).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validation_error_display() {
        let msg = ValidationError::MissingSource("cake".to_string()).to_string();
        assert!(msg.contains("cake"));
        assert!(msg.contains("source"));
    }
}
