//! Component reference data for the SIC engine
//!
//! Baseline reliability (L10: hours until 10% of a population has failed),
//! failure modes and serviceability of the physical parts products are
//! built from. Static; never mutated after load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Panel,
    Backlight,
    PowerSupply,
    Mainboard,
    Compressor,
    Coil,
    Motor,
    Bearing,
    Battery,
    Sensor,
    Seal,
    Consumable,
    Chassis,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Panel => "Painel",
            ComponentKind::Backlight => "Retroiluminação",
            ComponentKind::PowerSupply => "Fonte",
            ComponentKind::Mainboard => "Placa Eletrônica",
            ComponentKind::Compressor => "Compressor",
            ComponentKind::Coil => "Serpentina",
            ComponentKind::Motor => "Motor",
            ComponentKind::Bearing => "Rolamento",
            ComponentKind::Battery => "Bateria",
            ComponentKind::Sensor => "Sensor",
            ComponentKind::Seal => "Vedação",
            ComponentKind::Consumable => "Consumível",
            ComponentKind::Chassis => "Estrutura",
        }
    }
}

/// How easy it is to source replacement parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartsAvailability {
    High,
    Medium,
    Low,
    Discontinued,
}

impl PartsAvailability {
    pub fn score(&self) -> f64 {
        match self {
            PartsAvailability::High => 10.0,
            PartsAvailability::Medium => 6.5,
            PartsAvailability::Low => 3.0,
            PartsAvailability::Discontinued => 0.0,
        }
    }
}

/// How approachable the repair is without a technician
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiyLevel {
    Easy,
    Moderate,
    Hard,
    TechnicianOnly,
}

impl DiyLevel {
    pub fn score(&self) -> f64 {
        match self {
            DiyLevel::Easy => 10.0,
            DiyLevel::Moderate => 6.0,
            DiyLevel::Hard => 3.0,
            DiyLevel::TechnicianOnly => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub category_id: String,
    pub l10_hours: f64,
    pub failure_modes: Vec<String>,
    /// Typical repair cost in BRL
    pub repair_cost: f64,
    pub parts_availability: PartsAvailability,
    pub diy: DiyLevel,
    /// Whether this part's failure ends the product's useful life.
    /// Structural parts (chassis, drum) and consumables never do.
    pub structurally_limiting: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentLibrary {
    components: HashMap<String, ComponentDefinition>,
}

impl ComponentLibrary {
    pub fn new(components: Vec<ComponentDefinition>) -> Self {
        Self {
            components: components.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn insert(&mut self, component: ComponentDefinition) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn builtin() -> Self {
        Self::new(builtin_components())
    }
}

#[allow(clippy::too_many_arguments)]
fn component(
    id: &str,
    name: &str,
    kind: ComponentKind,
    category_id: &str,
    l10_hours: f64,
    failure_modes: &[&str],
    repair_cost: f64,
    parts_availability: PartsAvailability,
    diy: DiyLevel,
    structurally_limiting: bool,
) -> ComponentDefinition {
    ComponentDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        category_id: category_id.to_string(),
        l10_hours,
        failure_modes: failure_modes.iter().map(|s| s.to_string()).collect(),
        repair_cost,
        parts_availability,
        diy,
        structurally_limiting,
    }
}

fn builtin_components() -> Vec<ComponentDefinition> {
    use ComponentKind as K;
    use DiyLevel as D;
    use PartsAvailability as P;

    vec![
        // TVs (≈2190 h/year)
        component("tv-panel-oled", "Painel OLED", K::Panel, "tv", 24_000.0,
            &["burn-in", "perda de luminância do subpixel azul"], 3_500.0, P::Low, D::TechnicianOnly, true),
        component("tv-panel-lcd", "Painel LCD", K::Panel, "tv", 45_000.0,
            &["linhas verticais", "pixels mortos"], 2_200.0, P::Low, D::TechnicianOnly, true),
        component("tv-backlight-miniled", "Retroiluminação Mini-LED", K::Backlight, "tv", 22_000.0,
            &["zonas apagadas", "manchas de brilho"], 900.0, P::Medium, D::Hard, true),
        component("tv-backlight-edge", "Retroiluminação LED (edge)", K::Backlight, "tv", 17_500.0,
            &["barras de LED queimadas", "escurecimento lateral"], 450.0, P::High, D::Moderate, true),
        component("tv-psu", "Fonte de Alimentação", K::PowerSupply, "tv", 35_000.0,
            &["capacitores estufados", "não liga"], 350.0, P::High, D::Moderate, true),
        component("tv-mainboard", "Placa Principal", K::Mainboard, "tv", 40_000.0,
            &["travamentos", "falha de HDMI"], 600.0, P::Medium, D::Moderate, true),
        component("tv-chassis", "Gabinete e Suporte", K::Chassis, "tv", 150_000.0,
            &["trincas no suporte"], 150.0, P::Medium, D::Easy, false),
        // Refrigerators (≈4380 h/year of compressor duty)
        component("fridge-compressor-inverter", "Compressor Inverter", K::Compressor, "fridge", 60_000.0,
            &["placa inverter", "perda de eficiência"], 1_400.0, P::Medium, D::TechnicianOnly, true),
        component("fridge-compressor-conventional", "Compressor Convencional", K::Compressor, "fridge", 48_000.0,
            &["travamento", "relé de partida"], 900.0, P::High, D::TechnicianOnly, true),
        component("fridge-control-board", "Placa de Controle", K::Mainboard, "fridge", 70_000.0,
            &["sensor de temperatura", "falha de degelo"], 450.0, P::Medium, D::Moderate, true),
        component("fridge-door-gasket", "Borracha de Vedação", K::Seal, "fridge", 40_000.0,
            &["ressecamento", "perda de vedação"], 180.0, P::High, D::Easy, false),
        component("fridge-cabinet", "Gabinete", K::Chassis, "fridge", 150_000.0,
            &["ferrugem"], 0.0, P::Low, D::TechnicianOnly, false),
        // Air conditioners (≈2920 h/year)
        component("ac-compressor-inverter", "Compressor Inverter", K::Compressor, "air_conditioner", 40_000.0,
            &["placa inverter", "vazamento de óleo"], 1_800.0, P::Medium, D::TechnicianOnly, true),
        component("ac-compressor-rotary", "Compressor Rotativo On/Off", K::Compressor, "air_conditioner", 32_000.0,
            &["capacitor de partida", "travamento"], 1_200.0, P::High, D::TechnicianOnly, true),
        component("ac-coil-aluminum", "Serpentina de Alumínio", K::Coil, "air_conditioner", 26_000.0,
            &["corrosão", "microvazamentos de gás"], 1_100.0, P::Medium, D::TechnicianOnly, true),
        component("ac-coil-copper", "Serpentina de Cobre", K::Coil, "air_conditioner", 45_000.0,
            &["corrosão galvânica"], 1_300.0, P::Medium, D::TechnicianOnly, true),
        component("ac-fan-motor", "Motor do Ventilador", K::Motor, "air_conditioner", 38_000.0,
            &["ruído de rolamento", "não gira"], 380.0, P::High, D::Hard, true),
        component("ac-control-board", "Placa de Controle", K::Mainboard, "air_conditioner", 42_000.0,
            &["sensor de degelo", "falha de comunicação"], 550.0, P::Medium, D::Hard, true),
        // Robot vacuums (≈550 h/year)
        component("rv-battery-liion", "Bateria Li-ion", K::Battery, "robot_vacuum", 2_200.0,
            &["perda de autonomia", "não carrega"], 250.0, P::High, D::Easy, true),
        component("rv-lidar", "Módulo LiDAR", K::Sensor, "robot_vacuum", 4_400.0,
            &["motor do LiDAR travado", "erro de navegação"], 400.0, P::Medium, D::Moderate, true),
        component("rv-gyro", "Sensor Giroscópio", K::Sensor, "robot_vacuum", 5_000.0,
            &["deriva de navegação"], 150.0, P::Low, D::Hard, true),
        component("rv-drive-motor", "Motor de Tração", K::Motor, "robot_vacuum", 3_600.0,
            &["roda travada", "engrenagem desgastada"], 220.0, P::High, D::Moderate, true),
        component("rv-brushes", "Escovas e Filtros", K::Consumable, "robot_vacuum", 300.0,
            &["desgaste natural"], 80.0, P::High, D::Easy, false),
        // Washers (≈365 h/year)
        component("washer-motor-direct-drive", "Motor Direct Drive", K::Motor, "washer", 5_100.0,
            &["sensor hall", "ruído"], 1_100.0, P::Medium, D::TechnicianOnly, true),
        component("washer-motor-belt", "Motor com Correia", K::Motor, "washer", 3_650.0,
            &["correia partida", "escovas do motor"], 450.0, P::High, D::Moderate, true),
        component("washer-bearings", "Rolamentos do Tambor", K::Bearing, "washer", 3_300.0,
            &["ruído na centrifugação", "vazamento no retentor"], 500.0, P::High, D::Hard, true),
        component("washer-control-board", "Placa de Controle", K::Mainboard, "washer", 4_000.0,
            &["painel não responde", "erro de comunicação"], 600.0, P::Medium, D::Moderate, true),
        component("washer-drum", "Tambor", K::Chassis, "washer", 10_000.0,
            &["amassado"], 700.0, P::Low, D::TechnicianOnly, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::category_profile;

    #[test]
    fn test_builtin_components_belong_to_known_categories() {
        let library = ComponentLibrary::builtin();
        assert!(!library.is_empty());
        for c in builtin_components() {
            assert!(category_profile(&c.category_id).is_some(), "{} has no profile", c.id);
            assert!(c.l10_hours > 0.0);
            assert!(library.get(&c.id).is_some());
        }
    }

    #[test]
    fn test_chassis_never_limits() {
        let library = ComponentLibrary::builtin();
        assert!(!library.get("tv-chassis").unwrap().structurally_limiting);
        assert!(library.get("tv-backlight-miniled").unwrap().structurally_limiting);
    }

    #[test]
    fn test_tier_scores_are_ordered() {
        assert!(PartsAvailability::High.score() > PartsAvailability::Medium.score());
        assert!(PartsAvailability::Low.score() > PartsAvailability::Discontinued.score());
        assert!(DiyLevel::Easy.score() > DiyLevel::TechnicianOnly.score());
    }
}
