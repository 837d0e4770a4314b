//! ComparaTop scoring core
//!
//! Turns raw product attributes into explainable scores:
//! - Normalization of heterogeneous specs onto a 0-10 scale
//! - HMUM weighted aggregation with veto, imputation and use-case contexts
//! - Semantic adapter folding criteria into four metacategories
//! - SIC component intelligence (useful life, limiting part, repairability)
//! - Discounted total cost of ownership

pub mod types;
pub mod error;
pub mod field_path;
pub mod normalization;
pub mod categories;
pub mod builtin_categories;
pub mod hmum;
pub mod semantic_adapter;
pub mod profiles;
pub mod components;
pub mod quality_factors;
pub mod repairability;
pub mod sic;
pub mod tco;
pub mod catalog;
pub mod engine;
pub mod config;
pub mod server;

pub use types::*;
pub use error::{ConfigError, TcoError};
pub use field_path::FieldPath;
pub use normalization::{normalize, normalize_directed, Direction, NormalizationConfig};
pub use categories::{CategoryConfig, CategoryRegistry, CriterionDefinition, MissingValueStrategy, UseCaseContext, WeightPolicy};
pub use hmum::{BreadthSynergy, HmumAggregator, NoSynergy, SynergyBonus};
pub use semantic_adapter::{unify, weighted_harmonic_mean, MacroWeights, Metacategory, UnifiedScore};
pub use profiles::{category_profile, CategoryProfile};
pub use components::{ComponentDefinition, ComponentLibrary};
pub use quality_factors::{QualityFactorTable, QualityFactors};
pub use repairability::{RepairabilityMap, SIC_RI_WEIGHTS};
pub use sic::{ProductComponentMapping, SicKnowledgeBase, SicResult};
pub use tco::{calculate_tco, TcoBreakdown, TcoInput, TcoRequest};
pub use catalog::{InMemoryCatalog, ProductRepository};
pub use engine::{ProductReport, ScoringEngine, SharedScoringEngine};
pub use config::ServiceConfig;

#[cfg(test)]
mod tests;
