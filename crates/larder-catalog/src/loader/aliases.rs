//! Unit and product alias tables (INI).

use std::path::Path;

use larder_units::{ProductAliases, UnitAliases};
use tracing::info;

use super::load_ini;
use crate::error::CatalogError;

/// Section-less keys map a unit to its alias for every product; a `[unit]`
/// section maps `product = alias` for that unit only.
pub fn load_unit_aliases(path: &Path, aliases: &mut UnitAliases) -> Result<(), CatalogError> {
    let ini = load_ini(path)?;

    let mut entries = 0usize;
    for (section, properties) in ini.iter() {
        for (key, value) in properties.iter() {
            match section {
                None => aliases.insert_base(key, value),
                Some(unit) => aliases.insert_for_product(unit, key, value),
            }
            entries += 1;
        }
    }

    info!("Loaded {} unit aliases from {}", entries, path.display());
    Ok(())
}

/// Only section-less `name = canonical` keys are read.
pub fn load_product_aliases(path: &Path, aliases: &mut ProductAliases) -> Result<(), CatalogError> {
    let ini = load_ini(path)?;

    let mut entries = 0usize;
    if let Some(properties) = ini.section(None::<String>) {
        for (name, canonical) in properties.iter() {
            aliases.insert(name, canonical);
            entries += 1;
        }
    }

    info!("Loaded {} product aliases from {}", entries, path.display());
    Ok(())
}
