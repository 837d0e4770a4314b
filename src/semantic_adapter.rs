//! Semantic Adapter: unifies criteria into four metacategories
//!
//! The radar chart and the breakdown view both read from this. Each
//! metacategory is a weighted arithmetic mean of its member criteria; the
//! four metacategories combine by weighted *harmonic* mean, so one weak
//! dimension drags the overall score down hard.

use crate::categories::{CategoryConfig, CategoryRegistry};
use crate::hmum::evaluate_criterion;
use crate::types::{round1, round2, ProductRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scores are floored here before division in the harmonic mean
pub const HARMONIC_FLOOR: f64 = 0.1;

/// Hidden-truth criteria below this score raise a warning
pub const HIDDEN_TRUTH_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metacategory {
    Performance,
    Usability,
    Construction,
    Economy,
}

impl Metacategory {
    pub const ALL: [Metacategory; 4] = [
        Metacategory::Performance,
        Metacategory::Usability,
        Metacategory::Construction,
        Metacategory::Economy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metacategory::Performance => "Desempenho",
            Metacategory::Usability => "Usabilidade",
            Metacategory::Construction => "Construção",
            Metacategory::Economy => "Economia",
        }
    }
}

/// Per-category macro weights of the four metacategories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroWeights {
    pub performance: f64,
    pub usability: f64,
    pub construction: f64,
    pub economy: f64,
}

impl Default for MacroWeights {
    fn default() -> Self {
        Self {
            performance: 0.35,
            usability: 0.25,
            construction: 0.25,
            economy: 0.15,
        }
    }
}

impl MacroWeights {
    pub fn get(&self, meta: Metacategory) -> f64 {
        match meta {
            Metacategory::Performance => self.performance,
            Metacategory::Usability => self.usability,
            Metacategory::Construction => self.construction,
            Metacategory::Economy => self.economy,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [self.performance, self.usability, self.construction, self.economy];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("macro weights must be non-negative".to_string());
        }
        if all.iter().sum::<f64>() <= 0.0 {
            return Err("macro weights sum to zero".to_string());
        }
        Ok(())
    }
}

/// `Σw / Σ(w / max(score, floor))`. Entries with zero weight are skipped;
/// returns 0 when nothing carries weight.
pub fn weighted_harmonic_mean(entries: &[(f64, f64)]) -> f64 {
    let mut weight_sum = 0.0;
    let mut inverse_sum = 0.0;
    for &(score, weight) in entries {
        if weight <= 0.0 {
            continue;
        }
        weight_sum += weight;
        inverse_sum += weight / score.max(HARMONIC_FLOOR);
    }
    if inverse_sum <= 0.0 {
        0.0
    } else {
        weight_sum / inverse_sum
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetacategoryScore {
    pub metacategory: Metacategory,
    pub label: String,
    /// `None` when the category has no criteria in this metacategory
    pub score: Option<f64>,
    pub weight: f64,
    pub criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedScore {
    pub product_id: String,
    pub category_id: String,
    pub overall_score: f64,
    pub raw_overall: f64,
    pub metacategories: Vec<MetacategoryScore>,
    pub warnings: Vec<String>,
}

impl UnifiedScore {
    pub fn metacategory(&self, meta: Metacategory) -> Option<&MetacategoryScore> {
        self.metacategories.iter().find(|m| m.metacategory == meta)
    }
}

pub fn unify(registry: &CategoryRegistry, product: &ProductRecord) -> Option<UnifiedScore> {
    let category = registry.get(&product.category_id)?;
    Some(unify_category(category, product))
}

pub fn unify_category(category: &CategoryConfig, product: &ProductRecord) -> UnifiedScore {
    let mut sums = [(0.0f64, 0.0f64); 4]; // (Σ score·w, Σ w)
    let mut members: [Vec<String>; 4] = Default::default();
    let mut warnings = Vec::new();

    for def in category.criteria.iter().chain(category.extended_criteria.iter()) {
        let eval = evaluate_criterion(def, product);
        if let Some(w) = eval.warning() {
            warnings.push(w);
        }
        if eval.ignored {
            continue;
        }
        let slot = slot(def.metacategory);
        sums[slot].0 += eval.normalized * def.weight;
        sums[slot].1 += def.weight;
        members[slot].push(def.id.clone());

        if def.hidden_truth && eval.normalized < HIDDEN_TRUTH_THRESHOLD {
            let note = def
                .hidden_truth_note
                .clone()
                .unwrap_or_else(|| format!("nota baixa em {}", def.label));
            warnings.push(format!("{}: {} ({:.1}/10)", def.label, note, eval.normalized));
        }
    }

    let mut metacategories = Vec::with_capacity(4);
    let mut harmonic_entries = Vec::with_capacity(4);
    for (idx, meta) in Metacategory::ALL.iter().enumerate() {
        let (weighted, weight_sum) = sums[idx];
        let score = if weight_sum > 0.0 {
            Some(weighted / weight_sum)
        } else {
            None
        };
        let macro_weight = category.macro_weights.get(*meta);
        if let Some(s) = score {
            harmonic_entries.push((s, macro_weight));
        }
        metacategories.push(MetacategoryScore {
            metacategory: *meta,
            label: meta.label().to_string(),
            score: score.map(round2),
            weight: macro_weight,
            criteria: std::mem::take(&mut members[idx]),
        });
    }

    let raw_overall = weighted_harmonic_mean(&harmonic_entries);
    debug!(
        "Unified {}: overall={:.3} from {} metacategories, {} warnings",
        product.id,
        raw_overall,
        harmonic_entries.len(),
        warnings.len()
    );

    UnifiedScore {
        product_id: product.id.clone(),
        category_id: category.id.clone(),
        overall_score: round1(raw_overall),
        raw_overall,
        metacategories,
        warnings,
    }
}

fn slot(meta: Metacategory) -> usize {
    match meta {
        Metacategory::Performance => 0,
        Metacategory::Usability => 1,
        Metacategory::Construction => 2,
        Metacategory::Economy => 3,
    }
}
