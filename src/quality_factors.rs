//! Brand (πMarca) and technology (πTech) quality multipliers
//!
//! Both are centered on 1.0 and scale a component's baseline life.
//! Lookup misses resolve to 1.0 and leave a warning behind; an unknown
//! brand must never break the page.

use crate::profiles::category_profile;
use crate::types::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NEUTRAL_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFactors {
    pub brand_factor: f64,
    pub tech_factor: f64,
}

impl Default for QualityFactors {
    fn default() -> Self {
        Self {
            brand_factor: NEUTRAL_FACTOR,
            tech_factor: NEUTRAL_FACTOR,
        }
    }
}

impl QualityFactors {
    pub fn multiplier(&self) -> f64 {
        self.brand_factor * self.tech_factor
    }
}

/// Factors resolved for one product, with what was inferred along the way
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFactors {
    pub factors: QualityFactors,
    pub brand: Option<String>,
    pub technology: Option<String>,
    pub warnings: Vec<String>,
}

/// Category-level VUE: `base_vue × brand × tech`, clamped to the band
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VueEstimate {
    pub category_id: String,
    pub base_vue_years: f64,
    pub quality_factors: QualityFactors,
    pub adjusted_vue_years: f64,
    pub estimated_vue_years: f64,
    pub brand: Option<String>,
    pub technology: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QualityFactorTable {
    /// (category, brand) -> πMarca
    brand: HashMap<(String, String), f64>,
    /// (category, technology) -> πTech
    tech: HashMap<(String, String), f64>,
    /// Per category, ordered (keyword, technology) pairs matched against product ids
    tech_keywords: HashMap<String, Vec<(String, String)>>,
}

impl QualityFactorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brand(mut self, category: &str, brand: &str, factor: f64) -> Self {
        self.brand.insert((category.to_string(), brand.to_lowercase()), factor);
        self
    }

    pub fn with_tech(mut self, category: &str, tech: &str, factor: f64) -> Self {
        self.tech.insert((category.to_string(), tech.to_lowercase()), factor);
        self
    }

    pub fn with_tech_keyword(mut self, category: &str, keyword: &str, tech: &str) -> Self {
        self.tech_keywords
            .entry(category.to_string())
            .or_default()
            .push((keyword.to_lowercase(), tech.to_lowercase()));
        self
    }

    pub fn brand_factor(&self, category: &str, brand: &str) -> Option<f64> {
        self.brand
            .get(&(category.to_string(), brand.to_lowercase()))
            .copied()
    }

    pub fn tech_factor(&self, category: &str, tech: &str) -> Option<f64> {
        self.tech.get(&(category.to_string(), tech.to_lowercase())).copied()
    }

    /// Brand from the product id prefix: `samsung-qn90c-65` -> `samsung`
    pub fn infer_brand(&self, category: &str, product_id: &str) -> Option<String> {
        let prefix = product_id.split(['-', '_']).next()?.to_lowercase();
        self.brand_factor(category, &prefix).map(|_| prefix)
    }

    /// Technology from keywords in the product id, first match wins
    pub fn infer_technology(&self, category: &str, product_id: &str) -> Option<String> {
        let id = product_id.to_lowercase();
        self.tech_keywords
            .get(category)?
            .iter()
            .find(|(keyword, _)| id.contains(keyword.as_str()))
            .map(|(_, tech)| tech.clone())
    }

    /// Resolve πMarca and πTech. Explicit brand/tech win over inference.
    pub fn resolve(
        &self,
        category: &str,
        product_id: &str,
        brand: Option<&str>,
        technology: Option<&str>,
    ) -> ResolvedFactors {
        let mut warnings = Vec::new();

        let brand = brand
            .map(str::to_lowercase)
            .or_else(|| self.infer_brand(category, product_id));
        let brand_factor = match brand.as_deref() {
            Some(b) => self.brand_factor(category, b).unwrap_or_else(|| {
                warnings.push(format!("unknown brand '{}' for {}, using factor 1.0", b, category));
                NEUTRAL_FACTOR
            }),
            None => {
                warnings.push(format!("brand not identified for {}, using factor 1.0", product_id));
                NEUTRAL_FACTOR
            }
        };

        let technology = technology
            .map(str::to_lowercase)
            .or_else(|| self.infer_technology(category, product_id));
        let tech_factor = match technology.as_deref() {
            Some(t) => self.tech_factor(category, t).unwrap_or_else(|| {
                warnings.push(format!("unknown technology '{}' for {}, using factor 1.0", t, category));
                NEUTRAL_FACTOR
            }),
            None => {
                warnings.push(format!("technology not identified for {}, using factor 1.0", product_id));
                NEUTRAL_FACTOR
            }
        };

        ResolvedFactors {
            factors: QualityFactors {
                brand_factor,
                tech_factor,
            },
            brand,
            technology,
            warnings,
        }
    }

    /// Category-level VUE estimate; `None` for categories without a profile
    pub fn estimate_vue(
        &self,
        category: &str,
        product_id: &str,
        brand: Option<&str>,
        technology: Option<&str>,
    ) -> Option<VueEstimate> {
        let profile = category_profile(category)?;
        let resolved = self.resolve(category, product_id, brand, technology);
        let adjusted = profile.base_vue_years * resolved.factors.multiplier();

        let mut warnings = resolved.warnings;
        if !profile.in_band(adjusted) {
            warnings.push(format!(
                "adjusted VUE {:.1} years outside plausible band {:.0}-{:.0}",
                adjusted, profile.vue_band_years.0, profile.vue_band_years.1
            ));
        }

        Some(VueEstimate {
            category_id: category.to_string(),
            base_vue_years: profile.base_vue_years,
            quality_factors: resolved.factors,
            adjusted_vue_years: round2(adjusted),
            estimated_vue_years: round2(profile.clamp_vue(adjusted)),
            brand: resolved.brand,
            technology: resolved.technology,
            warnings,
        })
    }

    pub fn builtin() -> Self {
        Self::new()
            // TVs
            .with_brand("tv", "samsung", 1.05)
            .with_brand("tv", "lg", 1.05)
            .with_brand("tv", "sony", 1.08)
            .with_brand("tv", "philips", 0.97)
            .with_brand("tv", "tcl", 0.95)
            .with_brand("tv", "aoc", 0.92)
            .with_tech("tv", "mini-led", 1.05)
            .with_tech("tv", "oled", 1.00)
            .with_tech("tv", "qled", 1.00)
            .with_tech("tv", "led", 0.95)
            .with_tech_keyword("tv", "qn90", "mini-led")
            .with_tech_keyword("tv", "qn85", "mini-led")
            .with_tech_keyword("tv", "mini-led", "mini-led")
            .with_tech_keyword("tv", "miniled", "mini-led")
            .with_tech_keyword("tv", "oled", "oled")
            .with_tech_keyword("tv", "qled", "qled")
            .with_tech_keyword("tv", "led", "led")
            // Refrigerators
            .with_brand("fridge", "brastemp", 1.03)
            .with_brand("fridge", "electrolux", 1.00)
            .with_brand("fridge", "consul", 0.98)
            .with_brand("fridge", "samsung", 1.00)
            .with_brand("fridge", "lg", 1.02)
            .with_tech("fridge", "inverter", 1.08)
            .with_tech("fridge", "convencional", 1.00)
            .with_tech_keyword("fridge", "inverter", "inverter")
            // Air conditioners
            .with_brand("air_conditioner", "daikin", 1.08)
            .with_brand("air_conditioner", "lg", 1.03)
            .with_brand("air_conditioner", "samsung", 1.00)
            .with_brand("air_conditioner", "midea", 0.97)
            .with_brand("air_conditioner", "elgin", 0.95)
            .with_tech("air_conditioner", "inverter", 1.05)
            .with_tech("air_conditioner", "on-off", 0.95)
            .with_tech_keyword("air_conditioner", "inverter", "inverter")
            // Robot vacuums
            .with_brand("robot_vacuum", "roborock", 1.05)
            .with_brand("robot_vacuum", "irobot", 1.03)
            .with_brand("robot_vacuum", "xiaomi", 1.00)
            .with_brand("robot_vacuum", "electrolux", 0.95)
            .with_brand("robot_vacuum", "wap", 0.90)
            .with_tech("robot_vacuum", "lidar", 1.00)
            .with_tech("robot_vacuum", "gyro", 0.95)
            // Washers
            .with_brand("washer", "lg", 1.06)
            .with_brand("washer", "brastemp", 1.02)
            .with_brand("washer", "samsung", 1.02)
            .with_brand("washer", "electrolux", 1.00)
            .with_brand("washer", "consul", 0.97)
            .with_tech("washer", "direct-drive", 1.08)
            .with_tech("washer", "inverter", 1.04)
            .with_tech("washer", "convencional", 1.00)
            .with_tech_keyword("washer", "direct-drive", "direct-drive")
            .with_tech_keyword("washer", "inverter", "inverter")
    }
}
