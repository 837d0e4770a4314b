//! SIC: Component Intelligence System
//!
//! Maps a product to its physical components, scales each component's
//! baseline L10 life by the product's quality multipliers and derives:
//! - estimated useful life (VUE) from the limiting component
//! - the repairability index over all components
//! - warnings for every soft fallback taken on the way

use crate::components::{ComponentDefinition, ComponentLibrary};
use crate::error::ConfigError;
use crate::profiles::category_profile;
use crate::quality_factors::{QualityFactorTable, QualityFactors};
use crate::repairability::{repairability_index, RepairabilityMap};
use crate::types::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const BUILTIN_MAPPINGS: &str = include_str!("../data/sic_mappings.json");

/// Links a product to the components it is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductComponentMapping {
    pub product_id: String,
    pub category_id: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub technology: Option<String>,
    pub components: Vec<String>,
    /// Editorial pin of the limiting component; computed when absent
    #[serde(default)]
    pub limiting_component: Option<String>,
    #[serde(default)]
    pub quality_override: Option<QualityFactors>,
    #[serde(default)]
    pub replacement_cost: Option<f64>,
}

impl ProductComponentMapping {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMapping {
            product: self.product_id.clone(),
            reason,
        };

        if self.components.is_empty() {
            return Err(invalid("no components listed".to_string()));
        }
        if category_profile(&self.category_id).is_none() {
            return Err(invalid(format!("unknown category '{}'", self.category_id)));
        }
        if let Some(ref pin) = self.limiting_component {
            if !self.components.contains(pin) {
                return Err(invalid(format!("limiting component '{}' is not among its components", pin)));
            }
        }
        if let Some(q) = self.quality_override {
            let ok = |f: f64| f.is_finite() && f > 0.0;
            if !ok(q.brand_factor) || !ok(q.tech_factor) {
                return Err(invalid("quality factors must be positive".to_string()));
            }
        }
        if let Some(cost) = self.replacement_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(invalid(format!("invalid replacement cost {}", cost)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLife {
    pub component_id: String,
    pub name: String,
    pub l10_hours: f64,
    pub base_life_years: f64,
    pub adjusted_life_years: f64,
    pub structurally_limiting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitingComponent {
    pub id: String,
    pub name: String,
    pub category: String,
    pub l10_hours: f64,
    pub adjusted_life_years: f64,
    pub failure_modes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SicResult {
    pub product_id: String,
    pub category_id: String,
    /// VUE clamped to the category's plausible band
    pub estimated_lifespan_years: f64,
    pub raw_lifespan_years: f64,
    pub limiting_component: LimitingComponent,
    pub quality_factors: QualityFactors,
    pub repairability_map: RepairabilityMap,
    pub component_lives: Vec<ComponentLife>,
    pub warnings: Vec<String>,
}

/// Component library, quality factors and product mappings in one place
#[derive(Debug, Clone, Default)]
pub struct SicKnowledgeBase {
    components: ComponentLibrary,
    factors: QualityFactorTable,
    mappings: HashMap<String, ProductComponentMapping>,
}

impl SicKnowledgeBase {
    pub fn new(components: ComponentLibrary, factors: QualityFactorTable) -> Self {
        Self {
            components,
            factors,
            mappings: HashMap::new(),
        }
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(ComponentLibrary::builtin(), QualityFactorTable::builtin()).with_mappings_json(BUILTIN_MAPPINGS)
    }

    pub fn add_mapping(&mut self, mapping: ProductComponentMapping) -> Result<(), ConfigError> {
        mapping.validate()?;
        self.mappings.insert(mapping.product_id.clone(), mapping);
        Ok(())
    }

    pub fn with_mappings_json(mut self, json: &str) -> Result<Self, ConfigError> {
        let mappings: Vec<ProductComponentMapping> = serde_json::from_str(json)?;
        let count = mappings.len();
        for mapping in mappings {
            self.add_mapping(mapping)?;
        }
        info!("SIC knowledge base: {} components, {} mappings", self.components.len(), count);
        Ok(self)
    }

    pub fn mapping(&self, product_id: &str) -> Option<&ProductComponentMapping> {
        self.mappings.get(product_id)
    }

    pub fn factors(&self) -> &QualityFactorTable {
        &self.factors
    }

    pub fn components(&self) -> &ComponentLibrary {
        &self.components
    }

    /// Lifespan, limiting component and repairability for a mapped product.
    /// `None` means the product is not mapped: the feature is unavailable,
    /// not an error.
    pub fn calculate_sic(&self, product_id: &str) -> Option<SicResult> {
        let Some(mapping) = self.mappings.get(product_id) else {
            debug!("SIC unavailable for '{}': no component mapping", product_id);
            return None;
        };
        let profile = category_profile(&mapping.category_id)?;
        let mut warnings = Vec::new();

        let factors = match mapping.quality_override {
            Some(q) => q,
            None => {
                let resolved = self.factors.resolve(
                    &mapping.category_id,
                    product_id,
                    mapping.brand.as_deref(),
                    mapping.technology.as_deref(),
                );
                warnings.extend(resolved.warnings);
                resolved.factors
            }
        };
        let multiplier = factors.multiplier();

        let mut resolved: Vec<&ComponentDefinition> = Vec::with_capacity(mapping.components.len());
        for id in &mapping.components {
            match self.components.get(id) {
                Some(c) if c.category_id == mapping.category_id => resolved.push(c),
                Some(c) => warnings.push(format!(
                    "component '{}' belongs to '{}', not '{}', skipped",
                    id, c.category_id, mapping.category_id
                )),
                None => warnings.push(format!("unknown component '{}' skipped", id)),
            }
        }

        let lives: Vec<ComponentLife> = resolved
            .iter()
            .map(|c| {
                let base = profile.hours_to_years(c.l10_hours);
                ComponentLife {
                    component_id: c.id.clone(),
                    name: c.name.clone(),
                    l10_hours: c.l10_hours,
                    base_life_years: round2(base),
                    adjusted_life_years: base * multiplier,
                    structurally_limiting: c.structurally_limiting,
                }
            })
            .collect();

        let limiting_idx = self.pick_limiting(mapping, &resolved, &lives, &mut warnings);
        let Some(idx) = limiting_idx else {
            warn!("SIC for '{}': no structurally limiting component resolved", product_id);
            return None;
        };
        let limiting = resolved[idx];
        let raw_lifespan = lives[idx].adjusted_life_years;

        if !profile.in_band(raw_lifespan) {
            warnings.push(format!(
                "estimated life {:.1} years outside plausible band {:.0}-{:.0}, clamped",
                raw_lifespan, profile.vue_band_years.0, profile.vue_band_years.1
            ));
        }
        if mapping.replacement_cost.is_none() {
            warnings.push("replacement cost unknown, repair cost scored neutral".to_string());
        }

        let repairability_map = repairability_index(&resolved, mapping.replacement_cost);

        debug!(
            "SIC {}: limiting={} raw={:.2}y multiplier={:.3}",
            product_id, limiting.id, raw_lifespan, multiplier
        );

        Some(SicResult {
            product_id: product_id.to_string(),
            category_id: mapping.category_id.clone(),
            estimated_lifespan_years: round2(profile.clamp_vue(raw_lifespan)),
            raw_lifespan_years: round2(raw_lifespan),
            limiting_component: LimitingComponent {
                id: limiting.id.clone(),
                name: limiting.name.clone(),
                category: limiting.kind.label().to_string(),
                l10_hours: limiting.l10_hours,
                adjusted_life_years: round2(raw_lifespan),
                failure_modes: limiting.failure_modes.clone(),
            },
            quality_factors: factors,
            repairability_map,
            component_lives: lives
                .into_iter()
                .map(|mut l| {
                    l.adjusted_life_years = round2(l.adjusted_life_years);
                    l
                })
                .collect(),
            warnings,
        })
    }

    /// Explicit pin first; otherwise the shortest adjusted life among the
    /// structurally limiting components
    fn pick_limiting(
        &self,
        mapping: &ProductComponentMapping,
        resolved: &[&ComponentDefinition],
        lives: &[ComponentLife],
        warnings: &mut Vec<String>,
    ) -> Option<usize> {
        if let Some(ref pin) = mapping.limiting_component {
            match resolved.iter().position(|c| &c.id == pin) {
                Some(idx) => return Some(idx),
                None => warnings.push(format!("pinned limiting component '{}' unknown, computing instead", pin)),
            }
        }

        lives
            .iter()
            .enumerate()
            .filter(|(_, l)| l.structurally_limiting)
            .min_by(|(_, a), (_, b)| a.adjusted_life_years.total_cmp(&b.adjusted_life_years))
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentKind, DiyLevel, PartsAvailability};

    fn kb() -> SicKnowledgeBase {
        SicKnowledgeBase::builtin().unwrap()
    }

    #[test]
    fn test_qn90c_lifespan() {
        let sic = kb().calculate_sic("samsung-qn90c-65").unwrap();

        assert_eq!(sic.quality_factors.brand_factor, 1.05);
        assert_eq!(sic.quality_factors.tech_factor, 1.05);
        assert_eq!(sic.limiting_component.id, "tv-backlight-miniled");
        assert!((sic.estimated_lifespan_years - 11.02).abs() < 0.5);
        assert_eq!(sic.limiting_component.category, "Retroiluminação");
    }

    #[test]
    fn test_unmapped_product_is_unsupported() {
        assert!(kb().calculate_sic("acme-unknown-1").is_none());
    }

    #[test]
    fn test_chassis_excluded_from_limiting() {
        let mut kb = kb();
        let mut library = kb.components().clone();
        // A chassis with the shortest life still must not limit
        library.insert(ComponentDefinition {
            id: "tv-weak-chassis".into(),
            name: "Gabinete Frágil".into(),
            kind: ComponentKind::Chassis,
            category_id: "tv".into(),
            l10_hours: 1_000.0,
            failure_modes: vec![],
            repair_cost: 100.0,
            parts_availability: PartsAvailability::High,
            diy: DiyLevel::Easy,
            structurally_limiting: false,
        });
        kb.components = library;
        kb.add_mapping(ProductComponentMapping {
            product_id: "sony-x90l-65".into(),
            category_id: "tv".into(),
            brand: None,
            technology: Some("led".into()),
            components: vec!["tv-weak-chassis".into(), "tv-panel-lcd".into(), "tv-psu".into()],
            limiting_component: None,
            quality_override: None,
            replacement_cost: Some(5000.0),
        })
        .unwrap();

        let sic = kb.calculate_sic("sony-x90l-65").unwrap();
        assert_eq!(sic.limiting_component.id, "tv-psu");
        // repairability still covers every component
        assert_eq!(sic.repairability_map.components.len(), 3);
    }

    #[test]
    fn test_pinned_limiting_component_wins() {
        let sic = kb().calculate_sic("electrolux-lac12").unwrap();
        assert_eq!(sic.limiting_component.id, "washer-motor-belt");
    }

    #[test]
    fn test_out_of_band_is_clamped_with_warning() {
        let mut kb = kb();
        kb.add_mapping(ProductComponentMapping {
            product_id: "budget-tv".into(),
            category_id: "tv".into(),
            brand: Some("aoc".into()),
            technology: Some("led".into()),
            components: vec!["tv-backlight-edge".into()],
            limiting_component: None,
            quality_override: Some(QualityFactors {
                brand_factor: 0.5,
                tech_factor: 1.0,
            }),
            replacement_cost: Some(1500.0),
        })
        .unwrap();

        let sic = kb.calculate_sic("budget-tv").unwrap();
        assert!(sic.raw_lifespan_years < 6.0);
        assert_eq!(sic.estimated_lifespan_years, 6.0);
        assert!(sic.warnings.iter().any(|w| w.contains("outside plausible band")));
    }

    #[test]
    fn test_unknown_component_and_brand_degrade_softly() {
        let mut kb = kb();
        kb.add_mapping(ProductComponentMapping {
            product_id: "nobrand-tv-1".into(),
            category_id: "tv".into(),
            brand: Some("nobrand".into()),
            technology: None,
            components: vec!["tv-panel-lcd".into(), "tv-flux-capacitor".into()],
            limiting_component: None,
            quality_override: None,
            replacement_cost: None,
        })
        .unwrap();

        let sic = kb.calculate_sic("nobrand-tv-1").unwrap();
        assert_eq!(sic.quality_factors.brand_factor, 1.0);
        assert_eq!(sic.component_lives.len(), 1);
        assert!(sic.warnings.iter().any(|w| w.contains("tv-flux-capacitor")));
        assert!(sic.warnings.iter().any(|w| w.contains("nobrand")));
        assert!(sic.warnings.iter().any(|w| w.contains("replacement cost")));
    }

    #[test]
    fn test_foreign_category_component_is_skipped() {
        let mut kb = kb();
        kb.add_mapping(ProductComponentMapping {
            product_id: "philips-pus8808-55".into(),
            category_id: "tv".into(),
            brand: None,
            technology: Some("led".into()),
            // the belt motor would otherwise limit at 3650 / 2190 years
            components: vec!["tv-panel-lcd".into(), "washer-motor-belt".into(), "tv-psu".into()],
            limiting_component: None,
            quality_override: None,
            replacement_cost: Some(3000.0),
        })
        .unwrap();

        let sic = kb.calculate_sic("philips-pus8808-55").unwrap();
        assert_eq!(sic.limiting_component.id, "tv-psu");
        assert_eq!(sic.component_lives.len(), 2);
        assert_eq!(sic.repairability_map.components.len(), 2);
        assert!(sic
            .warnings
            .iter()
            .any(|w| w.contains("washer-motor-belt") && w.contains("belongs to 'washer'")));
    }

    #[test]
    fn test_invalid_mapping_rejected() {
        let mut kb = kb();
        let err = kb
            .add_mapping(ProductComponentMapping {
                product_id: "x".into(),
                category_id: "tv".into(),
                brand: None,
                technology: None,
                components: vec!["tv-psu".into()],
                limiting_component: Some("tv-panel-oled".into()),
                quality_override: None,
                replacement_cost: None,
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMapping { .. }));
    }
}
