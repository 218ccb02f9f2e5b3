//! Larder Catalog - recipe catalog and table loaders
//!
//! This crate reads the conversion, alias and recipe sheets at startup and
//! builds the immutable, unit-normalized recipe catalog.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod products;
pub mod validation;

pub use catalog::{RawCatalog, Recipe, RecipeCatalog, MAX_RECIPES};
pub use error::CatalogError;
pub use loader::{load, CatalogFiles, Larder};
pub use products::ProductUnits;
pub use validation::{validate_catalog, ValidationError};
