//! Core type definitions shared across the scoring core

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw attribute value as it arrives from the catalog (JSON-like)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Numeric view: numbers, numeric strings and booleans (1/0)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            RawValue::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            RawValue::Number(n) => Some(*n != 0.0),
            RawValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "sim" | "yes" | "1" => Some(true),
                "false" | "não" | "nao" | "no" | "0" => Some(false),
                _ => None,
            },
            RawValue::Null => None,
        }
    }

    /// Label view used by enum mappings
    pub fn as_label(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Null => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// A product as supplied by the data layer. Read-only to the scoring core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub category_id: String,
    pub brand: String,
    #[serde(default)]
    pub name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub specs: HashMap<String, RawValue>,
    #[serde(default)]
    pub scores: HashMap<String, Option<f64>>,   // raw c1..c10 inputs; null = missing
    #[serde(default)]
    pub attributes: HashMap<String, RawValue>,
}

impl ProductRecord {
    pub fn new(id: impl Into<String>, category_id: impl Into<String>, brand: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            brand: brand.into(),
            name: None,
            price,
            specs: HashMap::new(),
            scores: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_spec(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.specs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_score(mut self, criterion: &str, value: f64) -> Self {
        self.scores.insert(criterion.to_string(), Some(value));
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Per-criterion flags surfaced in the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionFlag {
    Veto,
    Imputed,
}

/// One row of the HMUM breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionContribution {
    pub criterion_id: String,
    pub label: String,
    pub normalized_value: f64,
    pub final_weight: f64,
    pub contribution: f64,
    pub flags: Vec<CriterionFlag>,
}

impl CriterionContribution {
    pub fn has_flag(&self, flag: CriterionFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Score of a product under one use-case context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextScore {
    pub context_id: String,
    pub label: String,
    pub score: f64,
}

/// HMUM output for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HmumResult {
    pub product_id: String,
    pub category_id: String,
    /// Final 0-10 score, one decimal
    pub score: f64,
    pub raw_score: f64,
    pub base_score: f64,
    pub hybrid_alpha: f64,
    pub context_scores: Vec<ContextScore>,
    pub best_context: Option<String>,
    pub synergy_bonus: f64,
    pub breakdown: Vec<CriterionContribution>,
    pub vetoed: bool,
    pub vetoed_by: Option<String>,
    pub warnings: Vec<String>,
}

/// Round to one decimal place, the precision scores are displayed with
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
