//! Conversion context: unit/product aliasing and quantity conversion.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::density::DensityTable;
use crate::measurement::{Measurement, Product};

/// Base conversions (`unit -> measurement`) plus product-specific overrides
/// (`unit -> product -> measurement`).
#[derive(Debug, Clone, Default)]
pub struct UnitConversions {
    by_product: HashMap<String, HashMap<String, Measurement>>,
    base: HashMap<String, Measurement>,
}

impl UnitConversions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register "one `unit` = `target`" for every product.
    pub fn insert_base(&mut self, unit: impl Into<String>, target: Measurement) {
        self.base.insert(unit.into(), target);
    }

    /// Register "one `unit` of `product` = `target`".
    pub fn insert_for_product(
        &mut self,
        unit: impl Into<String>,
        product: impl Into<String>,
        target: Measurement,
    ) {
        self.by_product
            .entry(unit.into())
            .or_default()
            .insert(product.into(), target);
    }

    pub fn base(&self, unit: &str) -> Option<&Measurement> {
        self.base.get(unit)
    }

    /// Product-specific conversion first, base conversion as fallback.
    pub fn lookup(&self, unit: &str, product: &str) -> Option<&Measurement> {
        self.by_product
            .get(unit)
            .and_then(|products| products.get(product))
            .or_else(|| self.base.get(unit))
    }

    pub fn base_entries(&self) -> impl Iterator<Item = (&str, &Measurement)> {
        self.base.iter().map(|(u, m)| (u.as_str(), m))
    }

    /// Every `(unit, product, measurement)` product-specific entry.
    pub fn product_entries(&self) -> impl Iterator<Item = (&str, &str, &Measurement)> {
        self.by_product.iter().flat_map(|(unit, products)| {
            products
                .iter()
                .map(move |(product, m)| (unit.as_str(), product.as_str(), m))
        })
    }
}

/// Unit synonyms, optionally specific to a product.
#[derive(Debug, Clone, Default)]
pub struct UnitAliases {
    by_product: HashMap<String, HashMap<String, String>>,
    base: HashMap<String, String>,
}

impl UnitAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_base(&mut self, unit: impl Into<String>, alias: impl Into<String>) {
        self.base.insert(unit.into(), alias.into());
    }

    pub fn insert_for_product(
        &mut self,
        unit: impl Into<String>,
        product: impl Into<String>,
        alias: impl Into<String>,
    ) {
        self.by_product
            .entry(unit.into())
            .or_default()
            .insert(product.into(), alias.into());
    }

    pub fn lookup(&self, unit: &str, product: &str) -> Option<&str> {
        self.by_product
            .get(unit)
            .and_then(|products| products.get(product))
            .or_else(|| self.base.get(unit))
            .map(String::as_str)
    }
}

/// Product synonyms mapped to one canonical name.
#[derive(Debug, Clone, Default)]
pub struct ProductAliases {
    aliases: HashMap<String, String>,
}

impl ProductAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(name.into(), canonical.into());
    }

    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Everything needed to bring a product into canonical name and reference
/// unit. Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    pub conversions: UnitConversions,
    pub unit_aliases: UnitAliases,
    pub product_aliases: ProductAliases,
    pub densities: DensityTable,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize a product's unit and name, then rescale its quantity into
    /// the reference unit.
    ///
    /// Unit aliases are resolved against the name as given; conversions are
    /// looked up with the canonical name. A product with no applicable
    /// conversion is returned as-is.
    pub fn normalize(&self, product: &Product) -> Product {
        let mut unit = product.measurement.unit.as_str();
        if let Some(alias) = self.unit_aliases.lookup(unit, &product.name) {
            unit = alias;
        }

        let name = self.product_aliases.canonical(&product.name);

        match self.conversions.lookup(unit, name) {
            Some(target) => Product {
                name: name.to_string(),
                measurement: Measurement::new(
                    product.measurement.quantity * target.quantity,
                    target.unit.clone(),
                ),
            },
            None => Product {
                name: name.to_string(),
                measurement: Measurement::new(product.measurement.quantity, unit),
            },
        }
    }

    /// Normalize a batch of products and key them by canonical name.
    ///
    /// Entries that collapse onto the same canonical name are summed when
    /// their units agree; otherwise the later entry replaces the earlier one.
    pub fn normalize_all<I>(&self, products: I) -> BTreeMap<String, Measurement>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut normalized: BTreeMap<String, Measurement> = BTreeMap::new();

        for product in products {
            let Product { name, measurement } = self.normalize(&product);
            match normalized.get_mut(&name) {
                Some(existing) if existing.unit == measurement.unit => {
                    existing.quantity += measurement.quantity;
                }
                Some(existing) => {
                    warn!(
                        "'{}' given as both {} and {}; keeping {}",
                        name, existing, measurement, measurement
                    );
                    *existing = measurement;
                }
                None => {
                    normalized.insert(name, measurement);
                }
            }
        }

        normalized
    }
}
