//! Larder Core - feasibility search engine
//!
//! This crate enumerates recipe subsets against a normalized stock snapshot,
//! keeps the maximal feasible ones and annotates them with their sources.

pub mod engine;
pub mod error;
pub mod recipe_set;
pub mod reducer;
pub mod suggest;

pub use engine::{FeasibilityEngine, Infeasibility, Search, SearchOutcome, Stock, QUANTITY_EPSILON};
pub use error::SuggestionError;
pub use recipe_set::RecipeSet;
pub use reducer::maximal_sets;
pub use suggest::{effective_servings, Suggester, Suggestion, Suggestions};
