//! Typed errors for catalog loading.

use std::path::PathBuf;

use larder_units::ParseMeasurementError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while building the catalog. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid INI in {path}: {source}")]
    Ini {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("{path}: invalid format of culinary unit description '{description}'")]
    MalformedUnitDescription { path: PathBuf, description: String },

    #[error("{path}: invalid measurement '{value}': {source}")]
    InvalidMeasurement {
        path: PathBuf,
        value: String,
        #[source]
        source: ParseMeasurementError,
    },

    #[error("{path}: invalid quantity '{value}'")]
    InvalidQuantity { path: PathBuf, value: String },

    #[error("{path}: record {record} has no column {column}")]
    MissingColumn {
        path: PathBuf,
        record: u64,
        column: usize,
    },

    #[error("catalog failed validation with {} errors", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl CatalogError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        CatalogError::Csv {
            path: path.into(),
            source,
        }
    }
}
