//! Load-time and input errors

use thiserror::Error;

/// Raised while loading category configs or component mappings.
/// Scoring itself never fails; it degrades softly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown field path '{0}' (expected scores.<id>, specs.<key>, attributes.<key>, price or brand)")]
    UnknownFieldPath(String),

    #[error("category '{category}': criterion {criterion} reads undeclared spec field '{field}'")]
    UndeclaredSpecField {
        category: String,
        criterion: String,
        field: String,
    },

    #[error("category '{category}': duplicate criterion id '{criterion}'")]
    DuplicateCriterion { category: String, criterion: String },

    #[error("category '{category}': criterion {criterion}: {reason}")]
    InvalidCriterion {
        category: String,
        criterion: String,
        reason: String,
    },

    #[error("category '{category}': {reason}")]
    InvalidCategory { category: String, reason: String },

    #[error("category '{category}': weights sum to {sum:.4}, expected 1.0")]
    WeightSumDrift { category: String, sum: f64 },

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("component mapping for '{product}': {reason}")]
    InvalidMapping { product: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Invalid input to the TCO calculator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TcoError {
    #[error("price must be a non-negative finite number, got {0}")]
    InvalidPrice(f64),

    #[error("lifespan must be between 0 and 100 years, got {0}")]
    InvalidLifespan(f64),

    #[error("{name} must be a non-negative finite number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("energy consumption unknown: give energyKwhMonth or a known categoryId")]
    MissingEnergy,
}
