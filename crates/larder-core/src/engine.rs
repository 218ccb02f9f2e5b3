//! Feasibility search over recipe subsets

use std::collections::{BTreeMap, HashMap};

use larder_catalog::{Recipe, RecipeCatalog};
use larder_units::{ConversionContext, DensityTable, Measurement, Product};
use tracing::debug;

use crate::recipe_set::RecipeSet;

/// Slack allowed below zero before a stock quantity counts as exhausted, so
/// that an exact fit survives floating point rounding.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// A normalized, request-owned stock snapshot.
#[derive(Debug, Clone, Default)]
pub struct Stock {
    slots: HashMap<String, usize>,
    names: Vec<String>,
    units: Vec<String>,
    quantities: Vec<f64>,
}

impl Stock {
    /// Normalize caller-supplied products through `ctx`.
    pub fn normalize<I>(ctx: &ConversionContext, products: I) -> Self
    where
        I: IntoIterator<Item = Product>,
    {
        Self::from_normalized(ctx.normalize_all(products))
    }

    /// Build from products that are already in canonical form.
    pub fn from_normalized(products: BTreeMap<String, Measurement>) -> Self {
        let mut stock = Stock::default();
        for (name, measurement) in products {
            stock.slots.insert(name.clone(), stock.names.len());
            stock.names.push(name);
            stock.units.push(measurement.unit);
            stock.quantities.push(measurement.quantity);
        }
        stock
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Measurement> {
        self.slots
            .get(name)
            .map(|&slot| Measurement::new(self.quantities[slot], self.units[slot].clone()))
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }
}

/// Why a recipe can never be part of a feasible subset for a given stock.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    MissingProduct {
        product: String,
    },
    IncomparableUnits {
        product: String,
        stock_unit: String,
        required_unit: String,
    },
}

/// What one recipe takes out of the stock: `(slot, quantity in stock unit)`.
#[derive(Debug, Clone)]
enum Demand {
    Consumes(Vec<(usize, f64)>),
    Unavailable(Infeasibility),
}

/// Result of enumerating every recipe subset.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub feasible: Vec<RecipeSet>,
    pub evaluated: u64,
}

/// Runs the subset search against a shared, read-only catalog.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityEngine<'a> {
    catalog: &'a RecipeCatalog,
    densities: &'a DensityTable,
}

impl<'a> FeasibilityEngine<'a> {
    pub fn new(catalog: &'a RecipeCatalog, densities: &'a DensityTable) -> Self {
        Self { catalog, densities }
    }

    /// Resolve each recipe's demand on `stock` at `servings` portions.
    ///
    /// The scaled quantities live only in the returned search; the catalog is
    /// never touched.
    pub fn prepare<'s>(&self, stock: &'s Stock, servings: u32) -> Search<'s> {
        let servings = f64::from(servings.max(1));
        let demands = self
            .catalog
            .recipes()
            .iter()
            .map(|recipe| self.demand(recipe, stock, servings))
            .collect();
        Search { stock, demands }
    }

    /// Every non-empty feasible subset of the catalog.
    pub fn search(&self, stock: &Stock, servings: u32) -> SearchOutcome {
        self.prepare(stock, servings).run()
    }

    fn demand(&self, recipe: &Recipe, stock: &Stock, servings: f64) -> Demand {
        let mut consumption = Vec::with_capacity(recipe.ingredients.len());

        for (product, required) in &recipe.ingredients {
            let Some(slot) = stock.slot(product) else {
                return Demand::Unavailable(Infeasibility::MissingProduct {
                    product: product.clone(),
                });
            };

            if required.is_to_taste() {
                continue;
            }

            let mut needed = required.quantity * servings;
            let stock_unit = &stock.units[slot];
            if *stock_unit != required.unit {
                let converted = self
                    .densities
                    .get(product)
                    .and_then(|density| density.convert(needed, &required.unit, stock_unit));
                match converted {
                    Some(quantity) => needed = quantity,
                    None => {
                        debug!(
                            "measurement units \"{}\" (from product list) and \"{}\" (from recipe '{}') are incomparable",
                            stock_unit, required.unit, recipe.name
                        );
                        return Demand::Unavailable(Infeasibility::IncomparableUnits {
                            product: product.clone(),
                            stock_unit: stock_unit.clone(),
                            required_unit: required.unit.clone(),
                        });
                    }
                }
            }

            consumption.push((slot, needed));
        }

        Demand::Consumes(consumption)
    }
}

/// A search prepared for one stock snapshot and serving count.
#[derive(Debug, Clone)]
pub struct Search<'s> {
    stock: &'s Stock,
    demands: Vec<Demand>,
}

impl Search<'_> {
    /// Evaluate `set` against a private copy of the stock quantities,
    /// stopping at the first recipe that cannot be met.
    pub fn is_feasible(&self, set: RecipeSet) -> bool {
        let mut remaining = self.stock.quantities.clone();

        for index in set.indices() {
            let Some(demand) = self.demands.get(index) else {
                return false;
            };
            let consumption = match demand {
                Demand::Consumes(consumption) => consumption,
                Demand::Unavailable(_) => return false,
            };
            for &(slot, quantity) in consumption {
                remaining[slot] -= quantity;
                if remaining[slot] < -QUANTITY_EPSILON {
                    return false;
                }
            }
        }

        true
    }

    /// Recipes that rule out every subset containing them, by catalog index.
    pub fn unavailable(&self) -> impl Iterator<Item = (usize, &Infeasibility)> {
        self.demands
            .iter()
            .enumerate()
            .filter_map(|(i, demand)| match demand {
                Demand::Unavailable(reason) => Some((i, reason)),
                Demand::Consumes(_) => None,
            })
    }

    pub fn run(&self) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        for set in RecipeSet::non_empty_subsets(self.demands.len()) {
            outcome.evaluated += 1;
            if self.is_feasible(set) {
                outcome.feasible.push(set);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_catalog::RawCatalog;
    use larder_units::{Density, TO_TASTE_UNIT};

    fn catalog(recipes: Vec<(&str, Vec<(&str, f64, &str)>)>) -> RecipeCatalog {
        let mut raw = RawCatalog::new();
        for (name, ingredients) in recipes {
            for (product, quantity, unit) in ingredients {
                raw.add_ingredient(name, Product::new(product, quantity, unit));
            }
            raw.add_source(name, "test");
        }
        RecipeCatalog::build(raw, &ConversionContext::new()).unwrap()
    }

    fn stock(products: &[(&str, f64, &str)]) -> Stock {
        Stock::normalize(
            &ConversionContext::new(),
            products.iter().map(|(n, q, u)| Product::new(*n, *q, *u)),
        )
    }

    #[test]
    fn test_missing_product_rules_out_recipe() {
        let catalog = catalog(vec![("omelette", vec![("egg", 2.0, "piece"), ("butter", 10.0, "g")])]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock = stock(&[("egg", 6.0, "piece")]);

        let search = engine.prepare(&stock, 1);
        assert!(!search.is_feasible(RecipeSet::from_indices([0])));
        let reasons: Vec<_> = search.unavailable().collect();
        assert_eq!(
            reasons,
            vec![(
                0,
                &Infeasibility::MissingProduct {
                    product: "butter".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_exact_fit_is_feasible() {
        let catalog = catalog(vec![
            ("a", vec![("rice", 0.1, "kg")]),
            ("b", vec![("rice", 0.2, "kg")]),
        ]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock = stock(&[("rice", 0.3, "kg")]);

        let outcome = engine.search(&stock, 1);
        assert_eq!(outcome.evaluated, 3);
        assert!(outcome.feasible.contains(&RecipeSet::from_indices([0, 1])));
    }

    #[test]
    fn test_density_converts_volume_requirement_to_mass_stock() {
        let catalog = catalog(vec![("porridge", vec![("oats", 200.0, "ml")])]);
        let mut densities = DensityTable::new();
        densities.insert(
            "oats",
            Density {
                ratio: 0.4,
                mass_unit: "g".to_string(),
                volume_unit: "ml".to_string(),
            },
        );
        let engine = FeasibilityEngine::new(&catalog, &densities);

        assert!(engine
            .prepare(&stock(&[("oats", 80.0, "g")]), 1)
            .is_feasible(RecipeSet::from_indices([0])));
        assert!(!engine
            .prepare(&stock(&[("oats", 79.0, "g")]), 1)
            .is_feasible(RecipeSet::from_indices([0])));
    }

    #[test]
    fn test_density_converts_mass_requirement_to_volume_stock() {
        let catalog = catalog(vec![("porridge", vec![("oats", 80.0, "g")])]);
        let mut densities = DensityTable::new();
        densities.insert(
            "oats",
            Density {
                ratio: 0.4,
                mass_unit: "g".to_string(),
                volume_unit: "ml".to_string(),
            },
        );
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock_ok = stock(&[("oats", 200.0, "ml")]);
        let search_ok = engine.prepare(&stock_ok, 1);
        assert!(search_ok.is_feasible(RecipeSet::from_indices([0])));
        let stock_short = stock(&[("oats", 150.0, "ml")]);
        let search_short = engine.prepare(&stock_short, 1);
        assert!(!search_short.is_feasible(RecipeSet::from_indices([0])));
    }

    #[test]
    fn test_units_without_density_are_incomparable() {
        let catalog = catalog(vec![("tea", vec![("sugar", 2.0, "tsp")])]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock = stock(&[("sugar", 1000.0, "g")]);

        let search = engine.prepare(&stock, 1);
        assert!(!search.is_feasible(RecipeSet::from_indices([0])));
        assert!(matches!(
            search.unavailable().next(),
            Some((0, Infeasibility::IncomparableUnits { .. }))
        ));
    }

    #[test]
    fn test_to_taste_needs_presence_only() {
        let catalog = catalog(vec![("salad", vec![("salt", 5000.0, TO_TASTE_UNIT)])]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);

        let with_salt = stock(&[("salt", 0.0, "g")]);
        assert!(engine
            .prepare(&with_salt, 10)
            .is_feasible(RecipeSet::from_indices([0])));

        let without_salt = stock(&[("pepper", 10.0, "g")]);
        assert!(!engine
            .prepare(&without_salt, 1)
            .is_feasible(RecipeSet::from_indices([0])));
    }

    #[test]
    fn test_zero_servings_treated_as_one() {
        let catalog = catalog(vec![("toast", vec![("bread", 2.0, "slice")])]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock = stock(&[("bread", 1.0, "slice")]);

        assert!(!engine
            .prepare(&stock, 0)
            .is_feasible(RecipeSet::from_indices([0])));
    }

    #[test]
    fn test_stock_snapshot_untouched_by_search() {
        let catalog = catalog(vec![("toast", vec![("bread", 2.0, "slice")])]);
        let densities = DensityTable::new();
        let engine = FeasibilityEngine::new(&catalog, &densities);
        let stock = stock(&[("bread", 3.0, "slice")]);

        let _ = engine.search(&stock, 1);
        assert_eq!(stock.get("bread"), Some(Measurement::new(3.0, "slice")));
    }
}
