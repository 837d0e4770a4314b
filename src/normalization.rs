//! Normalization of raw attribute values into 0-10 sub-scores

use crate::types::RawValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_SCORE: f64 = 10.0;

/// Score used when a value cannot be interpreted (unknown enum label)
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Whether a larger raw value is better or worse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Maximize,
    Minimize,
}

fn default_true_score() -> f64 {
    MAX_SCORE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizationConfig {
    /// Straight interpolation over `[min, max]`
    Linear { min: f64, max: f64 },
    /// Closer to `reference` is better; exponential punishment for distance
    InverseExp { reference: f64, decay: f64 },
    /// Diminishing returns for unbounded technical specs (nits, contrast)
    Logarithmic {
        #[serde(rename = "scaleFactor")]
        scale_factor: f64,
    },
    Boolean {
        #[serde(rename = "trueScore", default = "default_true_score")]
        true_score: f64,
        #[serde(rename = "falseScore", default)]
        false_score: f64,
    },
    /// Exact-match label table (display technology, compressor type, ...)
    Mapping { table: BTreeMap<String, f64> },
}

impl NormalizationConfig {
    pub fn boolean() -> Self {
        NormalizationConfig::Boolean {
            true_score: MAX_SCORE,
            false_score: 0.0,
        }
    }

    pub fn mapping<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        NormalizationConfig::Mapping {
            table: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    /// Whether `Direction::Minimize` flips this strategy's output.
    /// The other strategies encode preference in their own parameters.
    pub fn honors_direction(&self) -> bool {
        matches!(
            self,
            NormalizationConfig::Linear { .. } | NormalizationConfig::Logarithmic { .. }
        )
    }

    /// Check parameters; returns a human readable reason on failure
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |x: f64| x.is_finite() && (0.0..=MAX_SCORE).contains(&x);

        match self {
            NormalizationConfig::Linear { min, max } => {
                if !min.is_finite() || !max.is_finite() || max <= min {
                    return Err(format!("LINEAR range requires max > min (got {}..{})", min, max));
                }
            }
            NormalizationConfig::InverseExp { reference, decay } => {
                if !reference.is_finite() || !decay.is_finite() || *decay <= 0.0 {
                    return Err(format!("INVERSE_EXP requires decay > 0 (got {})", decay));
                }
            }
            NormalizationConfig::Logarithmic { scale_factor } => {
                if !scale_factor.is_finite() || *scale_factor <= 0.0 {
                    return Err(format!("LOGARITHMIC requires scaleFactor > 0 (got {})", scale_factor));
                }
            }
            NormalizationConfig::Boolean { true_score, false_score } => {
                if !in_range(*true_score) || !in_range(*false_score) {
                    return Err("BOOLEAN scores must lie in [0, 10]".to_string());
                }
            }
            NormalizationConfig::Mapping { table } => {
                if table.is_empty() {
                    return Err("MAPPING table is empty".to_string());
                }
                if let Some((label, score)) = table.iter().find(|(_, s)| !in_range(**s)) {
                    return Err(format!("MAPPING score for '{}' out of range: {}", label, score));
                }
            }
        }
        Ok(())
    }
}

/// Why a value was scored by a fallback rather than its strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Label absent from a MAPPING table; scored neutral
    UnknownLabel(String),
    /// Value of the wrong shape for the strategy; scored 0
    TypeMismatch { expected: &'static str },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::UnknownLabel(label) => {
                write!(f, "unknown value '{}', scored neutral {:.1}", label, NEUTRAL_SCORE)
            }
            Fallback::TypeMismatch { expected } => write!(f, "expected {}, scored 0", expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub score: f64,
    pub fallback: Option<Fallback>,
}

impl Normalized {
    fn exact(score: f64) -> Self {
        Self {
            score: clamp_score(score),
            fallback: None,
        }
    }

    fn fallback(score: f64, fallback: Fallback) -> Self {
        Self {
            score,
            fallback: Some(fallback),
        }
    }
}

/// Normalize a raw value into `[0, 10]`. Missing input scores 0; what to do
/// about missing data is the aggregator's decision.
pub fn normalize(raw: Option<&RawValue>, config: &NormalizationConfig) -> f64 {
    normalize_detailed(raw, config).score
}

/// Like [`normalize`], honoring `direction` for strategies that support it
pub fn normalize_directed(
    raw: Option<&RawValue>,
    config: &NormalizationConfig,
    direction: Direction,
) -> Normalized {
    let mut result = normalize_detailed(raw, config);
    let present = raw.map_or(false, |r| !r.is_missing());
    if present
        && result.fallback.is_none()
        && direction == Direction::Minimize
        && config.honors_direction()
    {
        result.score = clamp_score(MAX_SCORE - result.score);
    }
    result
}

pub fn normalize_detailed(raw: Option<&RawValue>, config: &NormalizationConfig) -> Normalized {
    let raw = match raw {
        Some(r) if !r.is_missing() => r,
        _ => return Normalized::exact(0.0),
    };

    match config {
        NormalizationConfig::Linear { min, max } => match finite_number(raw) {
            Some(x) => Normalized::exact(linear(x, *min, *max)),
            None => Normalized::fallback(0.0, Fallback::TypeMismatch { expected: "a number" }),
        },
        NormalizationConfig::InverseExp { reference, decay } => match finite_number(raw) {
            Some(x) => Normalized::exact(MAX_SCORE * (-decay * (x - reference).abs()).exp()),
            None => Normalized::fallback(0.0, Fallback::TypeMismatch { expected: "a number" }),
        },
        NormalizationConfig::Logarithmic { scale_factor } => match finite_number(raw) {
            Some(x) => Normalized::exact(((x.max(0.0) + 1.0).log10() * scale_factor).min(MAX_SCORE)),
            None => Normalized::fallback(0.0, Fallback::TypeMismatch { expected: "a number" }),
        },
        NormalizationConfig::Boolean { true_score, false_score } => match raw.as_bool() {
            Some(true) => Normalized::exact(*true_score),
            Some(false) => Normalized::exact(*false_score),
            None => Normalized::fallback(0.0, Fallback::TypeMismatch { expected: "a boolean" }),
        },
        NormalizationConfig::Mapping { table } => {
            let label = raw.as_label().unwrap_or_default();
            match table.get(&label) {
                Some(score) => Normalized::exact(*score),
                None => Normalized::fallback(NEUTRAL_SCORE, Fallback::UnknownLabel(label)),
            }
        }
    }
}

fn finite_number(raw: &RawValue) -> Option<f64> {
    raw.as_number().filter(|x| x.is_finite())
}

fn linear(x: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        // Degenerate range: at or above the bound counts as full marks
        return if x >= max { MAX_SCORE } else { 0.0 };
    }
    (x - min) / (max - min) * MAX_SCORE
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, MAX_SCORE)
    }
}
