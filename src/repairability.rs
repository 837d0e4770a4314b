//! SIC Repairability Index (SIC-RI)

use crate::components::ComponentDefinition;
use crate::normalization::{clamp_score, NEUTRAL_SCORE};
use crate::types::round1;
use serde::Serialize;

/// Weights of the three repairability dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepairabilityWeights {
    pub parts_availability: f64,
    pub repair_cost: f64,
    pub diy: f64,
}

pub const SIC_RI_WEIGHTS: RepairabilityWeights = RepairabilityWeights {
    parts_availability: 0.40,
    repair_cost: 0.35,
    diy: 0.25,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRepairability {
    pub component_id: String,
    pub name: String,
    pub parts_score: f64,
    pub cost_score: f64,
    pub diy_score: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairabilityMap {
    pub overall_score: f64,
    pub label: String,
    pub components: Vec<ComponentRepairability>,
}

pub fn repairability_label(score: f64) -> &'static str {
    if score >= 8.0 {
        "Fácil Reparo"
    } else if score >= 6.0 {
        "Reparo Moderado"
    } else if score >= 4.0 {
        "Reparo Difícil"
    } else {
        "Reparo Inviável"
    }
}

/// Repair cost relative to buying new: free repair scores 10, a repair
/// costing as much as a replacement scores 0. Unknown replacement cost
/// scores neutral.
pub fn cost_score(repair_cost: f64, replacement_cost: Option<f64>) -> f64 {
    match replacement_cost {
        Some(replacement) if replacement > 0.0 => {
            clamp_score(10.0 * (1.0 - (repair_cost / replacement).min(1.0)))
        }
        _ => NEUTRAL_SCORE,
    }
}

pub fn score_component(
    component: &ComponentDefinition,
    replacement_cost: Option<f64>,
) -> ComponentRepairability {
    let w = SIC_RI_WEIGHTS;
    let parts_score = component.parts_availability.score();
    let cost_score = cost_score(component.repair_cost, replacement_cost);
    let diy_score = component.diy.score();
    let score = parts_score * w.parts_availability + cost_score * w.repair_cost + diy_score * w.diy;

    ComponentRepairability {
        component_id: component.id.clone(),
        name: component.name.clone(),
        parts_score,
        cost_score: round1(cost_score),
        diy_score,
        score: round1(score),
    }
}

/// Index over all mapped components (not just the limiting one)
pub fn repairability_index(
    components: &[&ComponentDefinition],
    replacement_cost: Option<f64>,
) -> RepairabilityMap {
    let scored: Vec<ComponentRepairability> = components
        .iter()
        .map(|c| score_component(c, replacement_cost))
        .collect();

    let overall = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|c| c.score).sum::<f64>() / scored.len() as f64
    };

    let overall = round1(overall);
    RepairabilityMap {
        overall_score: overall,
        label: repairability_label(overall).to_string(),
        components: scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentLibrary;

    #[test]
    fn test_weights_sum_to_one() {
        let w = SIC_RI_WEIGHTS;
        assert!((w.parts_availability + w.repair_cost + w.diy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cost_score_relative_to_replacement() {
        assert_eq!(cost_score(0.0, Some(1000.0)), 10.0);
        assert!((cost_score(250.0, Some(1000.0)) - 7.5).abs() < 1e-12);
        assert_eq!(cost_score(2000.0, Some(1000.0)), 0.0);
        assert_eq!(cost_score(100.0, None), NEUTRAL_SCORE);
        assert_eq!(cost_score(100.0, Some(0.0)), NEUTRAL_SCORE);
    }

    #[test]
    fn test_component_score() {
        let library = ComponentLibrary::builtin();
        let battery = library.get("rv-battery-liion").unwrap();
        let scored = score_component(battery, Some(2500.0));
        // parts 10, cost 9, diy 10
        assert!((scored.score - 9.65).abs() <= 0.051);
        assert_eq!(scored.cost_score, 9.0);
    }

    #[test]
    fn test_index_averages_components() {
        let library = ComponentLibrary::builtin();
        let parts = vec![
            library.get("rv-battery-liion").unwrap(),
            library.get("rv-lidar").unwrap(),
        ];
        let map = repairability_index(&parts, Some(2500.0));
        assert_eq!(map.components.len(), 2);
        let mean = (map.components[0].score + map.components[1].score) / 2.0;
        assert!((map.overall_score - round1(mean)).abs() <= 0.051);
        assert_eq!(map.label, repairability_label(map.overall_score));
    }

    #[test]
    fn test_labels() {
        assert_eq!(repairability_label(9.0), "Fácil Reparo");
        assert_eq!(repairability_label(6.5), "Reparo Moderado");
        assert_eq!(repairability_label(4.0), "Reparo Difícil");
        assert_eq!(repairability_label(1.0), "Reparo Inviável");
    }
}
