//! Category configuration: criteria, weights, use-case contexts
//!
//! Configs are validated when they enter a [`CategoryRegistry`]; after
//! that the scoring code can assume every path is readable, every
//! normalization is well formed and the weights close to 1.0.

use crate::builtin_categories;
use crate::error::ConfigError;
use crate::field_path::FieldPath;
use crate::normalization::{Direction, NormalizationConfig, MAX_SCORE, NEUTRAL_SCORE};
use crate::semantic_adapter::{MacroWeights, Metacategory};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Tolerance for the weight-sum check
pub const WEIGHT_EPSILON: f64 = 1e-3;

pub const DEFAULT_HYBRID_ALPHA: f64 = 0.7;
pub const DEFAULT_VETO_PENALTY: f64 = 0.01;

fn default_hybrid_alpha() -> f64 {
    DEFAULT_HYBRID_ALPHA
}

fn default_veto_penalty() -> f64 {
    DEFAULT_VETO_PENALTY
}

/// What to do when a criterion's raw value is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Substitute a fixed score (typically the neutral midpoint)
    ImputePenalty {
        #[serde(rename = "imputeValue", default = "neutral")]
        impute_value: f64,
    },
    /// Missing data vetoes the product
    Veto,
    /// Score the criterion 0
    Zero,
    /// Drop the criterion and renormalize the remaining weights
    Ignore,
}

fn neutral() -> f64 {
    NEUTRAL_SCORE
}

impl Default for MissingValueStrategy {
    fn default() -> Self {
        MissingValueStrategy::ImputePenalty {
            impute_value: NEUTRAL_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionDefinition {
    pub id: String,
    pub label: String,
    pub field: FieldPath,
    pub weight: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub missing: MissingValueStrategy,
    #[serde(default)]
    pub veto_threshold: Option<f64>,
    pub normalization: NormalizationConfig,
    pub metacategory: Metacategory,
    #[serde(default)]
    pub hidden_truth: bool,
    #[serde(default)]
    pub hidden_truth_note: Option<String>,
}

impl CriterionDefinition {
    pub fn new(
        id: &str,
        label: &str,
        field: FieldPath,
        weight: f64,
        normalization: NormalizationConfig,
        metacategory: Metacategory,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            field,
            weight,
            direction: Direction::Maximize,
            missing: MissingValueStrategy::default(),
            veto_threshold: None,
            normalization,
            metacategory,
            hidden_truth: false,
            hidden_truth_note: None,
        }
    }

    pub fn minimize(mut self) -> Self {
        self.direction = Direction::Minimize;
        self
    }

    pub fn veto_at(mut self, threshold: f64) -> Self {
        self.veto_threshold = Some(threshold);
        self
    }

    pub fn when_missing(mut self, strategy: MissingValueStrategy) -> Self {
        self.missing = strategy;
        self
    }

    pub fn hidden_truth(mut self, note: &str) -> Self {
        self.hidden_truth = true;
        self.hidden_truth_note = Some(note.to_string());
        self
    }
}

/// A use-case lens ("gaming", "bright room") that re-weights criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseContext {
    pub id: String,
    pub label: String,
    /// Multipliers per criterion id; absent criteria keep 1.0
    #[serde(default)]
    pub weight_multipliers: HashMap<String, f64>,
}

impl UseCaseContext {
    pub fn new<'a>(id: &str, label: &str, multipliers: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            weight_multipliers: multipliers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn multiplier(&self, criterion_id: &str) -> f64 {
        self.weight_multipliers.get(criterion_id).copied().unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    pub id: String,
    pub label: String,
    /// Spec keys products of this category may carry
    pub spec_fields: Vec<String>,
    /// HMUM criteria (c1..c10), weights summing to 1.0
    pub criteria: Vec<CriterionDefinition>,
    /// Criteria that only feed the unified metacategory view
    #[serde(default)]
    pub extended_criteria: Vec<CriterionDefinition>,
    #[serde(default)]
    pub contexts: Vec<UseCaseContext>,
    #[serde(default = "default_hybrid_alpha")]
    pub hybrid_alpha: f64,
    #[serde(default = "default_veto_penalty")]
    pub veto_penalty: f64,
    #[serde(default)]
    pub macro_weights: MacroWeights,
}

/// How to treat HMUM weights that do not sum to 1.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Reject the category
    #[default]
    Strict,
    /// Rescale the weights and log a warning
    Normalize,
}

impl std::str::FromStr for WeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(WeightPolicy::Strict),
            "normalize" => Ok(WeightPolicy::Normalize),
            other => Err(format!("unknown weight policy '{}'", other)),
        }
    }
}

impl CategoryConfig {
    pub fn weight_sum(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    pub fn criterion(&self, id: &str) -> Option<&CriterionDefinition> {
        self.criteria
            .iter()
            .chain(self.extended_criteria.iter())
            .find(|c| c.id == id)
    }

    /// Validate the config, applying `policy` to weight drift
    pub fn validate(&mut self, policy: WeightPolicy) -> Result<(), ConfigError> {
        let category = self.id.clone();
        let invalid = |reason: String| ConfigError::InvalidCategory {
            category: category.clone(),
            reason,
        };

        if self.criteria.is_empty() {
            return Err(invalid("no criteria defined".to_string()));
        }
        if !(0.0..=1.0).contains(&self.hybrid_alpha) {
            return Err(invalid(format!("hybridAlpha {} outside [0, 1]", self.hybrid_alpha)));
        }
        if !(0.0..=1.0).contains(&self.veto_penalty) {
            return Err(invalid(format!("vetoPenalty {} outside [0, 1]", self.veto_penalty)));
        }
        self.macro_weights.validate().map_err(invalid)?;

        let spec_fields: HashSet<&str> = self.spec_fields.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();

        for criterion in self.criteria.iter().chain(self.extended_criteria.iter()) {
            if !seen.insert(criterion.id.as_str()) {
                return Err(ConfigError::DuplicateCriterion {
                    category: category.clone(),
                    criterion: criterion.id.clone(),
                });
            }
            validate_criterion(&category, criterion, &spec_fields)?;
        }

        let hmum_ids: HashSet<&str> = self.criteria.iter().map(|c| c.id.as_str()).collect();
        for context in &self.contexts {
            for (criterion, multiplier) in &context.weight_multipliers {
                if !hmum_ids.contains(criterion.as_str()) {
                    return Err(invalid(format!(
                        "context '{}' re-weights unknown criterion '{}'",
                        context.id, criterion
                    )));
                }
                if !multiplier.is_finite() || *multiplier < 0.0 {
                    return Err(invalid(format!(
                        "context '{}' has invalid multiplier {} for {}",
                        context.id, multiplier, criterion
                    )));
                }
            }
        }

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            match policy {
                WeightPolicy::Strict => {
                    return Err(ConfigError::WeightSumDrift { category, sum });
                }
                WeightPolicy::Normalize => {
                    if sum <= 0.0 {
                        return Err(ConfigError::WeightSumDrift { category, sum });
                    }
                    warn!("Category '{}' weights sum to {:.4}; rescaling to 1.0", self.id, sum);
                    for criterion in &mut self.criteria {
                        criterion.weight /= sum;
                    }
                }
            }
        }

        debug!(
            "Validated category '{}': {} criteria, {} extended, {} contexts",
            self.id,
            self.criteria.len(),
            self.extended_criteria.len(),
            self.contexts.len()
        );
        Ok(())
    }
}

fn validate_criterion(
    category: &str,
    criterion: &CriterionDefinition,
    spec_fields: &HashSet<&str>,
) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCriterion {
        category: category.to_string(),
        criterion: criterion.id.clone(),
        reason,
    };

    if let Some(key) = criterion.field.spec_key() {
        if !spec_fields.contains(key) {
            return Err(ConfigError::UndeclaredSpecField {
                category: category.to_string(),
                criterion: criterion.id.clone(),
                field: key.to_string(),
            });
        }
    }
    if !criterion.weight.is_finite() || criterion.weight < 0.0 {
        return Err(invalid(format!("weight {} must be >= 0", criterion.weight)));
    }
    criterion.normalization.validate().map_err(invalid)?;

    if let Some(threshold) = criterion.veto_threshold {
        if !(0.0..=MAX_SCORE).contains(&threshold) {
            return Err(invalid(format!("veto threshold {} outside [0, 10]", threshold)));
        }
    }
    if let MissingValueStrategy::ImputePenalty { impute_value } = criterion.missing {
        if !(0.0..=MAX_SCORE).contains(&impute_value) {
            return Err(invalid(format!("impute value {} outside [0, 10]", impute_value)));
        }
    }
    Ok(())
}

/// Validated category configs keyed by id
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<String, CategoryConfig>,
}

impl CategoryRegistry {
    pub fn new(configs: Vec<CategoryConfig>, policy: WeightPolicy) -> Result<Self, ConfigError> {
        let mut categories = HashMap::new();
        for mut config in configs {
            config.validate(policy)?;
            if categories.contains_key(&config.id) {
                return Err(ConfigError::DuplicateCategory(config.id));
            }
            categories.insert(config.id.clone(), config);
        }
        info!("Category registry loaded: {} categories", categories.len());
        Ok(Self { categories })
    }

    /// The categories shipped with the crate
    pub fn builtin(policy: WeightPolicy) -> Result<Self, ConfigError> {
        Self::new(builtin_categories::all(), policy)
    }

    /// Load a JSON array of category configs
    pub fn from_json(json: &str, policy: WeightPolicy) -> Result<Self, ConfigError> {
        let configs: Vec<CategoryConfig> = serde_json::from_str(json)?;
        Self::new(configs, policy)
    }

    pub fn get(&self, id: &str) -> Option<&CategoryConfig> {
        self.categories.get(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
