//! HMUM aggregation: weighted per-criterion scores into one 0-10 score
//!
//! Pipeline per product:
//! 1. Read and normalize every criterion
//! 2. Apply the missing-value strategy (impute, veto, zero, ignore)
//! 3. Flag vetoes
//! 4. Weighted sum into the context-free base score
//! 5. Hybrid blend with the best use-case context plus a synergy bonus

use crate::categories::{CategoryConfig, CategoryRegistry, CriterionDefinition, MissingValueStrategy};
use crate::normalization::{clamp_score, normalize_directed, Fallback};
use crate::types::*;
use std::sync::Arc;
use tracing::debug;

/// Outcome of reading and normalizing one criterion for one product
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionEvaluation {
    pub criterion_id: String,
    pub label: String,
    pub normalized: f64,
    pub imputed: bool,
    pub vetoed: bool,
    /// Dropped from aggregation (`ignore` strategy on missing data)
    pub ignored: bool,
    pub fallback: Option<Fallback>,
}

impl CriterionEvaluation {
    pub fn flags(&self) -> Vec<CriterionFlag> {
        let mut flags = Vec::new();
        if self.vetoed {
            flags.push(CriterionFlag::Veto);
        }
        if self.imputed {
            flags.push(CriterionFlag::Imputed);
        }
        flags
    }

    pub fn warning(&self) -> Option<String> {
        if let Some(ref fallback) = self.fallback {
            return Some(format!("{} ({}): {}", self.criterion_id, self.label, fallback));
        }
        if self.imputed {
            return Some(format!(
                "{} ({}): value missing, imputed {:.1}",
                self.criterion_id, self.label, self.normalized
            ));
        }
        if self.ignored {
            return Some(format!(
                "{} ({}): value missing, criterion ignored",
                self.criterion_id, self.label
            ));
        }
        None
    }
}

/// Read, normalize and apply missing-value policy for one criterion
pub fn evaluate_criterion(def: &CriterionDefinition, product: &ProductRecord) -> CriterionEvaluation {
    let raw = def.field.resolve(product);
    let mut eval = CriterionEvaluation {
        criterion_id: def.id.clone(),
        label: def.label.clone(),
        normalized: 0.0,
        imputed: false,
        vetoed: false,
        ignored: false,
        fallback: None,
    };

    match raw {
        Some(ref value) => {
            let normalized = normalize_directed(Some(value), &def.normalization, def.direction);
            eval.normalized = normalized.score;
            eval.fallback = normalized.fallback;
        }
        None => match def.missing {
            MissingValueStrategy::ImputePenalty { impute_value } => {
                eval.normalized = clamp_score(impute_value);
                eval.imputed = true;
            }
            MissingValueStrategy::Veto => eval.vetoed = true,
            MissingValueStrategy::Zero => {}
            MissingValueStrategy::Ignore => eval.ignored = true,
        },
    }

    if !eval.ignored {
        if let Some(threshold) = def.veto_threshold {
            if eval.normalized <= threshold {
                eval.vetoed = true;
            }
        }
    }
    eval
}

/// Bonus for products that do well across several use-case contexts.
/// The concrete formula is category policy, so it is pluggable.
pub trait SynergyBonus: Send + Sync {
    fn name(&self) -> &'static str;

    fn bonus(&self, base_score: f64, contexts: &[ContextScore]) -> f64;
}

/// Default: no bonus
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSynergy;

impl SynergyBonus for NoSynergy {
    fn name(&self) -> &'static str {
        "none"
    }

    fn bonus(&self, _base_score: f64, _contexts: &[ContextScore]) -> f64 {
        0.0
    }
}

/// Rewards every context beyond the first that clears `threshold`
#[derive(Debug, Clone, Copy)]
pub struct BreadthSynergy {
    pub threshold: f64,
    pub per_context: f64,
    pub cap: f64,
}

impl Default for BreadthSynergy {
    fn default() -> Self {
        Self {
            threshold: 7.5,
            per_context: 0.1,
            cap: 0.3,
        }
    }
}

impl SynergyBonus for BreadthSynergy {
    fn name(&self) -> &'static str {
        "breadth"
    }

    fn bonus(&self, _base_score: f64, contexts: &[ContextScore]) -> f64 {
        let strong = contexts.iter().filter(|c| c.score >= self.threshold).count();
        let extra = strong.saturating_sub(1) as f64;
        (extra * self.per_context).min(self.cap)
    }
}

/// HMUM aggregator (stateless apart from its synergy strategy)
#[derive(Clone)]
pub struct HmumAggregator {
    synergy: Arc<dyn SynergyBonus>,
}

impl Default for HmumAggregator {
    fn default() -> Self {
        Self::new(Arc::new(NoSynergy))
    }
}

impl std::fmt::Debug for HmumAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmumAggregator")
            .field("synergy", &self.synergy.name())
            .finish()
    }
}

impl HmumAggregator {
    pub fn new(synergy: Arc<dyn SynergyBonus>) -> Self {
        Self { synergy }
    }

    /// Score a product against its own category. `None` when the category
    /// is not configured.
    pub fn score(&self, registry: &CategoryRegistry, product: &ProductRecord) -> Option<HmumResult> {
        match registry.get(&product.category_id) {
            Some(category) => Some(self.aggregate(category, product)),
            None => {
                debug!(
                    "HMUM unsupported for product '{}': unknown category '{}'",
                    product.id, product.category_id
                );
                None
            }
        }
    }

    pub fn aggregate(&self, category: &CategoryConfig, product: &ProductRecord) -> HmumResult {
        let evaluations: Vec<(&CriterionDefinition, CriterionEvaluation)> = category
            .criteria
            .iter()
            .map(|def| (def, evaluate_criterion(def, product)))
            .collect();

        let active_weight: f64 = evaluations
            .iter()
            .filter(|(_, e)| !e.ignored)
            .map(|(d, _)| d.weight)
            .sum();

        // Weights only need rescaling when a criterion was ignored
        let scale = if active_weight > 0.0 && evaluations.iter().any(|(_, e)| e.ignored) {
            1.0 / active_weight
        } else {
            1.0
        };

        let mut breakdown = Vec::with_capacity(evaluations.len());
        let mut warnings = Vec::new();
        let mut base_score = 0.0;
        let mut vetoed_by = None;

        for (def, eval) in &evaluations {
            if let Some(w) = eval.warning() {
                warnings.push(w);
            }
            if eval.ignored {
                continue;
            }
            let final_weight = def.weight * scale;
            let contribution = eval.normalized * final_weight;
            base_score += contribution;

            if eval.vetoed && vetoed_by.is_none() {
                vetoed_by = Some(def.id.clone());
            }

            breakdown.push(CriterionContribution {
                criterion_id: def.id.clone(),
                label: def.label.clone(),
                normalized_value: round2(eval.normalized),
                final_weight,
                contribution,
                flags: eval.flags(),
            });
        }
        let base_score = clamp_score(base_score);

        let context_scores = contextual_scores(category, &evaluations);
        let best = context_scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score));
        let best_context = best.map(|c| c.context_id.clone());

        let (raw_score, synergy_bonus) = if let Some(ref criterion) = vetoed_by {
            warnings.push(format!(
                "{}: vetoed, score multiplied by {}",
                criterion, category.veto_penalty
            ));
            (base_score * category.veto_penalty, 0.0)
        } else {
            let bonus = self.synergy.bonus(base_score, &context_scores);
            let blended = match best {
                Some(best) => {
                    category.hybrid_alpha * base_score + (1.0 - category.hybrid_alpha) * best.score
                }
                None => base_score,
            };
            (clamp_score(blended + bonus), bonus)
        };

        debug!(
            "HMUM {}: base={:.3} final={:.3} vetoed={:?}",
            product.id, base_score, raw_score, vetoed_by
        );

        HmumResult {
            product_id: product.id.clone(),
            category_id: category.id.clone(),
            score: round1(raw_score),
            raw_score,
            base_score,
            hybrid_alpha: category.hybrid_alpha,
            context_scores,
            best_context,
            synergy_bonus,
            breakdown,
            vetoed: vetoed_by.is_some(),
            vetoed_by,
            warnings,
        }
    }
}

/// Score under each use-case context: weights scaled by the context's
/// multipliers and renormalized to 1
fn contextual_scores(
    category: &CategoryConfig,
    evaluations: &[(&CriterionDefinition, CriterionEvaluation)],
) -> Vec<ContextScore> {
    category
        .contexts
        .iter()
        .filter_map(|context| {
            let mut weighted = 0.0;
            let mut total_weight = 0.0;
            for (def, eval) in evaluations.iter().filter(|(_, e)| !e.ignored) {
                let w = def.weight * context.multiplier(&def.id);
                weighted += eval.normalized * w;
                total_weight += w;
            }
            if total_weight <= 0.0 {
                return None;
            }
            Some(ContextScore {
                context_id: context.id.clone(),
                label: context.label.clone(),
                score: clamp_score(weighted / total_weight),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{UseCaseContext, WeightPolicy, DEFAULT_VETO_PENALTY};
    use crate::field_path::FieldPath;
    use crate::normalization::NormalizationConfig;
    use crate::semantic_adapter::{MacroWeights, Metacategory};

    fn score_criterion(id: &str, weight: f64) -> CriterionDefinition {
        CriterionDefinition::new(
            id,
            &format!("Critério {}", id),
            FieldPath::Score(id.to_string()),
            weight,
            NormalizationConfig::Linear { min: 0.0, max: 10.0 },
            Metacategory::Performance,
        )
    }

    fn category(criteria: Vec<CriterionDefinition>) -> CategoryConfig {
        let mut cfg = CategoryConfig {
            id: "test".into(),
            label: "Test".into(),
            spec_fields: vec![],
            criteria,
            extended_criteria: vec![],
            contexts: vec![],
            hybrid_alpha: 0.7,
            veto_penalty: DEFAULT_VETO_PENALTY,
            macro_weights: MacroWeights::default(),
        };
        cfg.validate(WeightPolicy::Strict).unwrap();
        cfg
    }

    fn product(scores: &[(&str, f64)]) -> ProductRecord {
        scores
            .iter()
            .fold(ProductRecord::new("p", "test", "acme", 1000.0), |p, (k, v)| p.with_score(k, *v))
    }

    #[test]
    fn test_weight_closure() {
        let cfg = category(vec![
            score_criterion("c1", 0.5),
            score_criterion("c2", 0.3),
            score_criterion("c3", 0.2),
        ]);
        let result = HmumAggregator::default().aggregate(&cfg, &product(&[("c1", 8.0), ("c2", 6.0), ("c3", 9.0)]));

        let expected = 8.0 * 0.5 + 6.0 * 0.3 + 9.0 * 0.2;
        assert!((result.raw_score - expected).abs() < 1e-9);
        assert_eq!(result.score, 7.6);
        let sum: f64 = result.breakdown.iter().map(|b| b.contribution).sum();
        assert!((sum - expected).abs() < 1e-9);
        assert!(!result.vetoed);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_imputation_matches_explicit_neutral() {
        let cfg = category(vec![
            score_criterion("c1", 0.4),
            score_criterion("c2", 0.3),
            score_criterion("c3", 0.3).when_missing(MissingValueStrategy::ImputePenalty { impute_value: 5.0 }),
        ]);
        let agg = HmumAggregator::default();
        let missing = agg.aggregate(&cfg, &product(&[("c1", 9.0), ("c2", 7.0)]));
        let explicit = agg.aggregate(&cfg, &product(&[("c1", 9.0), ("c2", 7.0), ("c3", 5.0)]));

        assert_eq!(missing.raw_score, explicit.raw_score);
        assert!(missing.breakdown[2].has_flag(CriterionFlag::Imputed));
        assert!(!explicit.breakdown[2].has_flag(CriterionFlag::Imputed));
        assert_eq!(missing.warnings.len(), 1);
    }

    #[test]
    fn test_veto_dominates() {
        let cfg = category(vec![
            score_criterion("c1", 0.5),
            score_criterion("c2", 0.5).veto_at(2.0),
        ]);
        let result = HmumAggregator::default().aggregate(&cfg, &product(&[("c1", 10.0), ("c2", 2.0)]));

        assert!(result.vetoed);
        assert_eq!(result.vetoed_by.as_deref(), Some("c2"));
        assert!(result.raw_score <= result.base_score * DEFAULT_VETO_PENALTY + 1e-12);
        assert!(result.breakdown[1].has_flag(CriterionFlag::Veto));
        // breakdown stays intact for transparency
        assert_eq!(result.breakdown[0].normalized_value, 10.0);
    }

    #[test]
    fn test_missing_with_veto_strategy() {
        let cfg = category(vec![
            score_criterion("c1", 0.5),
            score_criterion("c2", 0.5).when_missing(MissingValueStrategy::Veto),
        ]);
        let result = HmumAggregator::default().aggregate(&cfg, &product(&[("c1", 9.0)]));
        assert!(result.vetoed);
        assert!(result.score < 0.1);
    }

    #[test]
    fn test_ignore_renormalizes_weights() {
        let cfg = category(vec![
            score_criterion("c1", 0.5),
            score_criterion("c2", 0.25),
            score_criterion("c3", 0.25).when_missing(MissingValueStrategy::Ignore),
        ]);
        let result = HmumAggregator::default().aggregate(&cfg, &product(&[("c1", 8.0), ("c2", 2.0)]));

        assert_eq!(result.breakdown.len(), 2);
        let weights: f64 = result.breakdown.iter().map(|b| b.final_weight).sum();
        assert!((weights - 1.0).abs() < 1e-12);
        assert!((result.raw_score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_hybrid_blend_uses_best_context() {
        let mut cfg = category(vec![score_criterion("c1", 0.5), score_criterion("c2", 0.5)]);
        cfg.contexts = vec![
            UseCaseContext::new("gaming", "Jogos", [("c1", 3.0)]),
            UseCaseContext::new("cinema", "Cinema", [("c2", 3.0)]),
        ];
        let result = HmumAggregator::default().aggregate(&cfg, &product(&[("c1", 10.0), ("c2", 4.0)]));

        // base 7.0; gaming = (30 + 2) / 4 = 8.5
        assert!((result.base_score - 7.0).abs() < 1e-9);
        assert_eq!(result.best_context.as_deref(), Some("gaming"));
        let expected = 0.7 * 7.0 + 0.3 * 8.5;
        assert!((result.raw_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_breadth_synergy_rewards_multiple_strong_contexts() {
        let mut cfg = category(vec![score_criterion("c1", 0.5), score_criterion("c2", 0.5)]);
        cfg.contexts = vec![
            UseCaseContext::new("a", "A", [("c1", 2.0)]),
            UseCaseContext::new("b", "B", [("c2", 2.0)]),
        ];
        let p = product(&[("c1", 9.0), ("c2", 9.0)]);

        let plain = HmumAggregator::default().aggregate(&cfg, &p);
        let synergy = HmumAggregator::new(Arc::new(BreadthSynergy::default())).aggregate(&cfg, &p);

        assert_eq!(plain.synergy_bonus, 0.0);
        assert!((synergy.synergy_bonus - 0.1).abs() < 1e-12);
        assert!(synergy.raw_score > plain.raw_score);
    }

    #[test]
    fn test_unknown_category_is_unsupported() {
        let registry = CategoryRegistry::builtin(WeightPolicy::Strict).unwrap();
        let p = ProductRecord::new("x", "toaster", "acme", 100.0);
        assert!(HmumAggregator::default().score(&registry, &p).is_none());
    }
}
