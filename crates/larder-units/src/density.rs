//! Per-product densities for mass <-> volume conversion

use std::collections::HashMap;

use crate::measurement::Measurement;

/// Mass units per volume unit for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub ratio: f64,
    pub mass_unit: String,
    pub volume_unit: String,
}

impl Density {
    /// Convert `quantity` expressed in `from` into `to`.
    ///
    /// Returns `None` when the pair is not this density's (volume, mass) axis
    /// in either direction, which callers treat as incomparable units.
    pub fn convert(&self, quantity: f64, from: &str, to: &str) -> Option<f64> {
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return None;
        }
        if from == self.volume_unit && to == self.mass_unit {
            Some(quantity * self.ratio)
        } else if from == self.mass_unit && to == self.volume_unit {
            Some(quantity / self.ratio)
        } else {
            None
        }
    }
}

/// Densities keyed by canonical product name.
#[derive(Debug, Clone, Default)]
pub struct DensityTable {
    entries: HashMap<String, Density>,
}

impl DensityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: impl Into<String>, density: Density) {
        self.entries.insert(product.into(), density);
    }

    pub fn get(&self, product: &str) -> Option<&Density> {
        self.entries.get(product)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates density samples from one row of a conversion table.
///
/// The first measurement fixes the mass unit and the first column fixes the
/// reference volume unit (the target of that column's base conversion).
///
/// Samples are not limited to the first column: every cell in that mass unit
/// whose column converts to the same reference volume unit counts, so
/// `cup (240 ml)` and `tbsp (15 ml)` both contribute to a row's density.
/// Cells in another mass unit, or under a column converting to another
/// unit (`stick (113 g)`), are ignored. Each sample is the measured mass
/// divided by the column's base factor, i.e. mass per reference volume unit,
/// and the result is their mean.
#[derive(Debug, Default)]
pub struct DensitySampler {
    mass_unit: Option<String>,
    volume_unit: Option<String>,
    sum: f64,
    count: usize,
}

impl DensitySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cell found under `column_unit`, whose base conversion
    /// (if any) is `base`.
    pub fn observe(
        &mut self,
        column_unit: &str,
        base: Option<&Measurement>,
        measurement: &Measurement,
    ) {
        let mass_unit = self
            .mass_unit
            .get_or_insert_with(|| measurement.unit.clone());
        let volume_unit = self.volume_unit.get_or_insert_with(|| {
            base.map(|b| b.unit.clone())
                .unwrap_or_else(|| column_unit.to_string())
        });

        if *mass_unit != measurement.unit {
            return;
        }

        match base {
            Some(base) if base.unit == *volume_unit && base.quantity != 0.0 => {
                self.sum += measurement.quantity / base.quantity;
                self.count += 1;
            }
            _ => {}
        }
    }

    pub fn sample_count(&self) -> usize {
        self.count
    }

    /// `None` when no qualifying sample was seen.
    pub fn finish(self) -> Option<Density> {
        if self.count == 0 {
            return None;
        }
        Some(Density {
            ratio: self.sum / self.count as f64,
            mass_unit: self.mass_unit?,
            volume_unit: self.volume_unit?,
        })
    }
}
