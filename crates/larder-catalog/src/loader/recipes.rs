//! Recipe ingredient and recipe source sheets (CSV).

use std::path::Path;

use csv::StringRecord;
use larder_units::{Product, NOT_APPLICABLE};
use tracing::info;

use super::csv_reader;
use crate::catalog::RawCatalog;
use crate::error::CatalogError;

const SOURCE_RECIPE_COLUMN: usize = 0;
const SOURCE_CITATION_COLUMN: usize = 4;

const INGREDIENT_NAME_COLUMN: usize = 0;
const INGREDIENT_QUANTITY_COLUMN: usize = 1;
const INGREDIENT_UNIT_COLUMN: usize = 2;
const INGREDIENT_RECIPE_COLUMN: usize = 3;

fn column<'r>(path: &Path, record: &'r StringRecord, column: usize) -> Result<&'r str, CatalogError> {
    record.get(column).ok_or_else(|| CatalogError::MissingColumn {
        path: path.to_path_buf(),
        record: record.position().map(|p| p.line()).unwrap_or_default(),
        column,
    })
}

/// Read `recipe name -> source` from the sources sheet. The first row is a
/// header.
pub fn load_sources(path: &Path, raw: &mut RawCatalog) -> Result<(), CatalogError> {
    let mut reader = csv_reader(path)?;

    let mut count = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::csv(path, e))?;
        let recipe = column(path, &record, SOURCE_RECIPE_COLUMN)?;
        let source = column(path, &record, SOURCE_CITATION_COLUMN)?;
        raw.add_source(recipe, source);
        count += 1;
    }

    info!("Loaded {} recipe sources from {}", count, path.display());
    Ok(())
}

/// Read one ingredient sheet: `ingredient, quantity, unit, recipe` per row
/// after a header. A quantity of `-` reads as zero.
pub fn load_ingredients(path: &Path, raw: &mut RawCatalog) -> Result<(), CatalogError> {
    let mut reader = csv_reader(path)?;

    let mut count = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::csv(path, e))?;
        let name = column(path, &record, INGREDIENT_NAME_COLUMN)?;
        let quantity = column(path, &record, INGREDIENT_QUANTITY_COLUMN)?;
        let unit = column(path, &record, INGREDIENT_UNIT_COLUMN)?;
        let recipe = column(path, &record, INGREDIENT_RECIPE_COLUMN)?;

        let quantity = if quantity == NOT_APPLICABLE {
            0.0
        } else {
            quantity
                .parse::<f64>()
                .map_err(|_| CatalogError::InvalidQuantity {
                    path: path.to_path_buf(),
                    value: quantity.to_string(),
                })?
        };

        raw.add_ingredient(recipe, Product::new(name, quantity, unit));
        count += 1;
    }

    info!("Loaded {} ingredient rows from {}", count, path.display());
    Ok(())
}
