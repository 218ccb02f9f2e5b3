//! Units a client may use for each product.

use std::collections::{BTreeMap, BTreeSet};

use larder_units::UnitConversions;

/// `product -> units` index, derived from the conversion tables.
///
/// A product that has product-specific conversions can be entered in any of
/// those source units, in their targets, or in any base conversion target.
#[derive(Debug, Clone, Default)]
pub struct ProductUnits {
    units: BTreeMap<String, BTreeSet<String>>,
}

impl ProductUnits {
    pub fn from_conversions(conversions: &UnitConversions) -> Self {
        let mut units: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (unit, product, target) in conversions.product_entries() {
            let set = units.entry(product.to_string()).or_default();
            set.insert(unit.to_string());
            set.insert(target.unit.clone());
        }

        let base_targets: BTreeSet<String> = conversions
            .base_entries()
            .map(|(_, target)| target.unit.clone())
            .collect();
        for set in units.values_mut() {
            set.extend(base_targets.iter().cloned());
        }

        Self { units }
    }

    /// Sorted units for `product`; empty when the product is unknown.
    pub fn units(&self, product: &str) -> Vec<String> {
        self.units
            .get(product)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
