//! ScoringEngine: runs HMUM, the semantic adapter, SIC and TCO for products
//! pulled from a repository

use crate::catalog::ProductRepository;
use crate::categories::{CategoryRegistry, WeightPolicy};
use crate::error::TcoError;
use crate::field_path::FieldPath;
use crate::hmum::HmumAggregator;
use crate::profiles::category_profile;
use crate::semantic_adapter::{unify_category, UnifiedScore};
use crate::sic::{SicKnowledgeBase, SicResult};
use crate::tco::{calculate_tco, TcoBreakdown, TcoInput, DEFAULT_ENERGY_RATE};
use crate::types::{HmumResult, ProductRecord};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Spec key a product may use to declare its own monthly consumption
const ENERGY_SPEC_KEY: &str = "energy_kwh_month";

/// Everything the scoring core knows about one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub product_id: String,
    pub name: String,
    pub category_id: String,
    pub brand: String,
    pub price: f64,
    pub hmum: Option<HmumResult>,
    pub unified: Option<UnifiedScore>,
    pub sic: Option<SicResult>,
    pub tco: Option<TcoBreakdown>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub product_id: String,
    pub name: String,
    pub score: Option<f64>,
    pub overall_score: Option<f64>,
    pub vetoed: bool,
    pub estimated_lifespan_years: Option<f64>,
    pub total_tco: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRanking {
    pub category_id: String,
    pub label: String,
    pub entries: Vec<RankingEntry>,
    pub generation_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub reports: Vec<ProductReport>,
    pub missing: Vec<String>,
}

/// Summary for third-party AI agents; these keys are a published contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiSummary {
    pub product_id: String,
    pub name: String,
    pub category_id: String,
    pub hmum_score: Option<f64>,
    pub nota_auditoria: Option<f64>,
    pub estimated_lifespan_years: Option<f64>,
    pub total_tco: Option<i64>,
    pub warnings: Vec<String>,
}

/// Scoring engine (thread-safe via Arc)
pub struct ScoringEngine {
    repository: Box<dyn ProductRepository>,
    categories: CategoryRegistry,
    sic: SicKnowledgeBase,
    hmum: HmumAggregator,
    energy_rate: f64,
}

pub type SharedScoringEngine = Arc<ScoringEngine>;

impl ScoringEngine {
    pub fn new(
        repository: Box<dyn ProductRepository>,
        categories: CategoryRegistry,
        sic: SicKnowledgeBase,
        hmum: HmumAggregator,
        energy_rate: f64,
    ) -> SharedScoringEngine {
        info!(
            "Scoring engine ready: repository={}, {} categories, energy rate R$ {:.2}/kWh",
            repository.name(),
            categories.len(),
            energy_rate
        );
        Arc::new(Self {
            repository,
            categories,
            sic,
            hmum,
            energy_rate,
        })
    }

    /// Built-in categories and component knowledge over the given repository
    pub fn builtin(repository: Box<dyn ProductRepository>, policy: WeightPolicy) -> Result<SharedScoringEngine> {
        Ok(Self::new(
            repository,
            CategoryRegistry::builtin(policy)?,
            SicKnowledgeBase::builtin()?,
            HmumAggregator::default(),
            DEFAULT_ENERGY_RATE,
        ))
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn energy_rate(&self) -> f64 {
        self.energy_rate
    }

    pub async fn product(&self, id: &str) -> Result<Option<ProductRecord>> {
        self.repository.get_product(id).await
    }

    pub fn score_product(&self, product: &ProductRecord) -> Option<HmumResult> {
        self.hmum.score(&self.categories, product)
    }

    pub fn unified_product(&self, product: &ProductRecord) -> Option<UnifiedScore> {
        let category = self.categories.get(&product.category_id)?;
        Some(unify_category(category, product))
    }

    pub fn sic_product(&self, product: &ProductRecord) -> Option<SicResult> {
        self.sic.calculate_sic(&product.id)
    }

    /// TCO over the SIC lifespan when there is one, else the category's
    /// default horizon. `Ok(None)` for categories without a profile.
    pub fn tco_product(
        &self,
        product: &ProductRecord,
        sic: Option<&SicResult>,
    ) -> Result<Option<TcoBreakdown>, TcoError> {
        let Some(mut input) = TcoInput::for_category(&product.category_id, product.price) else {
            return Ok(None);
        };
        input = input.with_energy_rate(self.energy_rate);

        let declared = FieldPath::Spec(ENERGY_SPEC_KEY.to_string())
            .resolve(product)
            .and_then(|v| v.as_number());
        if let Some(kwh) = declared {
            input = input.with_energy_kwh_month(kwh);
        }
        if let Some(sic) = sic {
            input = input.with_lifespan(sic.estimated_lifespan_years);
        }

        calculate_tco(&input).map(Some)
    }

    pub fn report_product(&self, product: &ProductRecord) -> ProductReport {
        let hmum = self.score_product(product);
        let unified = self.unified_product(product);
        let sic = self.sic_product(product);

        let mut warnings = Vec::new();
        if hmum.is_none() {
            warnings.push(format!("category '{}' is not supported", product.category_id));
        }
        if sic.is_none() {
            warnings.push("component analysis unavailable".to_string());
        }
        if category_profile(&product.category_id).is_none() {
            warnings.push("no cost profile for this category".to_string());
        }
        let tco = match self.tco_product(product, sic.as_ref()) {
            Ok(tco) => tco,
            Err(e) => {
                warn!("TCO failed for '{}': {}", product.id, e);
                warnings.push(format!("TCO unavailable: {}", e));
                None
            }
        };

        ProductReport {
            product_id: product.id.clone(),
            name: product.display_name().to_string(),
            category_id: product.category_id.clone(),
            brand: product.brand.clone(),
            price: product.price,
            hmum,
            unified,
            sic,
            tco,
            warnings,
        }
    }

    pub async fn report(&self, id: &str) -> Result<Option<ProductReport>> {
        Ok(self.product(id).await?.map(|p| self.report_product(&p)))
    }

    /// Reports for several products, in request order
    pub async fn compare(&self, ids: &[String]) -> Result<Comparison> {
        let tasks = ids.iter().map(|id| async move { (id, self.report(id).await) });
        let results = futures::future::join_all(tasks).await;

        let mut reports = Vec::new();
        let mut missing = Vec::new();
        for (id, res) in results {
            match res? {
                Some(report) => reports.push(report),
                None => missing.push(id.clone()),
            }
        }
        debug!("Compared {} products, {} missing", reports.len(), missing.len());
        Ok(Comparison { reports, missing })
    }

    /// Products of a category ordered by HMUM score; `None` for unknown
    /// categories
    pub async fn rank_category(&self, category_id: &str) -> Result<Option<CategoryRanking>> {
        let Some(category) = self.categories.get(category_id) else {
            debug!("Ranking requested for unknown category '{}'", category_id);
            return Ok(None);
        };
        let start = Instant::now();

        let products = self.repository.list_category(category_id).await?;
        let tasks = products.iter().map(|p| async move { self.report_product(p) });
        let mut reports = futures::future::join_all(tasks).await;

        let score_of = |r: &ProductReport| r.hmum.as_ref().map(|h| h.raw_score).unwrap_or(f64::NEG_INFINITY);
        reports.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)).then_with(|| a.product_id.cmp(&b.product_id)));

        let entries: Vec<RankingEntry> = reports
            .into_iter()
            .enumerate()
            .map(|(idx, r)| RankingEntry {
                rank: idx + 1,
                product_id: r.product_id,
                name: r.name,
                score: r.hmum.as_ref().map(|h| h.score),
                overall_score: r.unified.as_ref().map(|u| u.overall_score),
                vetoed: r.hmum.as_ref().map(|h| h.vetoed).unwrap_or(false),
                estimated_lifespan_years: r.sic.as_ref().map(|s| s.estimated_lifespan_years),
                total_tco: r.tco.map(|t| t.total_tco),
            })
            .collect();

        info!("Ranked {} products in '{}'", entries.len(), category_id);

        Ok(Some(CategoryRanking {
            category_id: category.id.clone(),
            label: category.label.clone(),
            entries,
            generation_time_ms: start.elapsed().as_millis() as u64,
        }))
    }

    pub async fn ai_summary(&self, id: &str) -> Result<Option<AiSummary>> {
        Ok(self.report(id).await?.map(|r| {
            let mut warnings = r.warnings;
            if let Some(ref h) = r.hmum {
                warnings.extend(h.warnings.iter().cloned());
            }
            if let Some(ref u) = r.unified {
                warnings.extend(u.warnings.iter().cloned());
            }
            if let Some(ref s) = r.sic {
                warnings.extend(s.warnings.iter().cloned());
            }
            AiSummary {
                product_id: r.product_id,
                name: r.name,
                category_id: r.category_id,
                hmum_score: r.hmum.map(|h| h.score),
                nota_auditoria: r.unified.map(|u| u.overall_score),
                estimated_lifespan_years: r.sic.map(|s| s.estimated_lifespan_years),
                total_tco: r.tco.map(|t| t.total_tco),
                warnings,
            }
        }))
    }
}
