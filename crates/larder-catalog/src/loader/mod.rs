//! Startup loaders for the conversion, alias and recipe tables.

mod aliases;
mod conversion;
mod recipes;

use std::fs::File;
use std::path::{Path, PathBuf};

use ini::Ini;
use larder_units::{ConversionContext, Measurement};
use tracing::info;

use crate::catalog::{RawCatalog, RecipeCatalog};
use crate::error::CatalogError;
use crate::products::ProductUnits;

pub use aliases::{load_product_aliases, load_unit_aliases};
pub use conversion::{load_conversion_csv, load_conversion_ini, parse_unit_description};
pub use recipes::{load_ingredients, load_sources};

/// Locations of every table the service is built from.
#[derive(Debug, Clone, Default)]
pub struct CatalogFiles {
    pub conversion_csv: Option<PathBuf>,
    pub conversion_ini: Option<PathBuf>,
    pub unit_aliases: Option<PathBuf>,
    pub product_aliases: Option<PathBuf>,
    pub sources: PathBuf,
    pub recipes: Vec<PathBuf>,
}

/// Everything built at startup. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Larder {
    pub context: ConversionContext,
    pub catalog: RecipeCatalog,
    /// Ingredient names as spelled in the recipe sheets, sorted.
    pub products: Vec<String>,
    pub product_units: ProductUnits,
}

/// Load all tables and build the normalized catalog.
///
/// Conversions and aliases must be complete before the recipes are
/// normalized, so the order here matters.
pub fn load(files: &CatalogFiles) -> Result<Larder, CatalogError> {
    let mut context = ConversionContext::new();

    if let Some(path) = &files.conversion_csv {
        load_conversion_csv(path, &mut context)?;
    }
    if let Some(path) = &files.conversion_ini {
        load_conversion_ini(path, &mut context)?;
    }
    if let Some(path) = &files.unit_aliases {
        load_unit_aliases(path, &mut context.unit_aliases)?;
    }
    if let Some(path) = &files.product_aliases {
        load_product_aliases(path, &mut context.product_aliases)?;
    }

    let mut raw = RawCatalog::new();
    load_sources(&files.sources, &mut raw)?;
    for path in &files.recipes {
        load_ingredients(path, &mut raw)?;
    }

    let products = raw.ingredient_names();
    let product_units = ProductUnits::from_conversions(&context.conversions);
    let catalog = RecipeCatalog::build(raw, &context)?;

    info!(
        "Larder ready: {} recipes, {} products, {} densities",
        catalog.len(),
        products.len(),
        context.densities.len()
    );

    Ok(Larder {
        context,
        catalog,
        products,
        product_units,
    })
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Header-aware CSV reader with trimmed fields and ragged rows allowed.
pub(crate) fn csv_reader(path: &Path) -> Result<csv::Reader<File>, CatalogError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(open(path)?))
}

pub(crate) fn load_ini(path: &Path) -> Result<Ini, CatalogError> {
    Ini::load_from_file(path).map_err(|source| CatalogError::Ini {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_measurement(path: &Path, value: &str) -> Result<Measurement, CatalogError> {
    value
        .parse()
        .map_err(|source| CatalogError::InvalidMeasurement {
            path: path.to_path_buf(),
            value: value.to_string(),
            source,
        })
}
