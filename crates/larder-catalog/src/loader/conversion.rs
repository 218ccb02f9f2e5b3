//! Conversion tables: the CSV density sheet and the INI conversion list.

use std::path::Path;
use std::sync::LazyLock;

use ini::Ini;
use larder_units::{ConversionContext, DensitySampler, Measurement, NOT_APPLICABLE};
use regex::Regex;
use tracing::{debug, info};

use super::{csv_reader, load_ini, parse_measurement};
use crate::error::CatalogError;

/// `cup (240 ml)` -> unit `cup`, one cup is 240 ml.
static UNIT_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*\(\s*(\d+(?:\.\d+)?)\s*(.+?)\s*\)").expect("valid unit regex")
});

/// Parse a CSV column header such as `cup (240 ml)`.
pub fn parse_unit_description(description: &str) -> Option<(String, Measurement)> {
    let captures = UNIT_DESCRIPTION.captures(description)?;
    let unit = captures.get(1)?.as_str().to_string();
    let quantity: f64 = captures.get(2)?.as_str().parse().ok()?;
    let target = captures.get(3)?.as_str();
    Some((unit, Measurement::new(quantity, target)))
}

/// Load the CSV conversion sheet.
///
/// The header names one unit per column together with its base conversion;
/// every product row then gives, per column, how much one such unit of the
/// product measures (or `-`). Each cell becomes a product-specific
/// conversion, and the row as a whole yields the product's density.
pub fn load_conversion_csv(path: &Path, ctx: &mut ConversionContext) -> Result<(), CatalogError> {
    let mut reader = csv_reader(path)?;

    let headers = reader
        .headers()
        .map_err(|e| CatalogError::csv(path, e))?
        .clone();

    let mut units = Vec::with_capacity(headers.len().saturating_sub(1));
    for description in headers.iter().skip(1) {
        let (unit, base) = parse_unit_description(description).ok_or_else(|| {
            CatalogError::MalformedUnitDescription {
                path: path.to_path_buf(),
                description: description.to_string(),
            }
        })?;
        ctx.conversions.insert_base(unit.clone(), base);
        units.push(unit);
    }

    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::csv(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let Some(product) = record.get(0) else {
            continue;
        };

        let mut sampler = DensitySampler::new();
        for (column, cell) in record.iter().skip(1).enumerate() {
            if cell.is_empty() || cell == NOT_APPLICABLE {
                continue;
            }
            let unit = units.get(column).ok_or_else(|| CatalogError::MissingColumn {
                path: path.to_path_buf(),
                record: line,
                column: column + 1,
            })?;
            let measurement = parse_measurement(path, cell)?;

            sampler.observe(unit, ctx.conversions.base(unit), &measurement);
            ctx.conversions
                .insert_for_product(unit.as_str(), product, measurement);
        }

        match sampler.finish() {
            Some(density) => {
                debug!(
                    "Density of '{}': {} {} per {}",
                    product, density.ratio, density.mass_unit, density.volume_unit
                );
                ctx.densities.insert(product, density);
            }
            None => debug!("No density samples for '{}'", product),
        }
        rows += 1;
    }

    info!(
        "Loaded {} unit columns and {} products from {}",
        units.len(),
        rows,
        path.display()
    );
    Ok(())
}

/// Load the INI conversion list.
///
/// Section-less keys are base conversions (`unit = 240 ml`); a `[unit]`
/// section lists product-specific ones (`flour = 120 g`).
pub fn load_conversion_ini(path: &Path, ctx: &mut ConversionContext) -> Result<(), CatalogError> {
    let ini = load_ini(path)?;
    apply_conversion_ini(&ini, path, ctx)
}

fn apply_conversion_ini(ini: &Ini, path: &Path, ctx: &mut ConversionContext) -> Result<(), CatalogError> {
    let mut entries = 0usize;
    for (section, properties) in ini.iter() {
        for (key, value) in properties.iter() {
            let measurement = parse_measurement(path, value)?;
            match section {
                None => ctx.conversions.insert_base(key, measurement),
                Some(unit) => ctx.conversions.insert_for_product(unit, key, measurement),
            }
            entries += 1;
        }
    }

    info!("Loaded {} conversions from {}", entries, path.display());
    Ok(())
}
