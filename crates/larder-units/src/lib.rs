//! Larder Units - measurement model and unit normalization
//!
//! This crate holds the conversion context shared by the catalog loader and
//! the request path: unit and product aliasing, base and product-specific
//! conversions, and the per-product density table.

pub mod context;
pub mod density;
pub mod measurement;

pub use context::{ConversionContext, ProductAliases, UnitAliases, UnitConversions};
pub use density::{Density, DensitySampler, DensityTable};
pub use measurement::{
    Measurement, ParseMeasurementError, Product, NOT_APPLICABLE, TO_TASTE_UNIT,
};
