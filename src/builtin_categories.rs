//! Category configs shipped with the crate (one function per category)

use crate::categories::{
    CategoryConfig, CriterionDefinition, MissingValueStrategy, UseCaseContext, DEFAULT_HYBRID_ALPHA,
    DEFAULT_VETO_PENALTY,
};
use crate::field_path::FieldPath;
use crate::normalization::NormalizationConfig as N;
use crate::semantic_adapter::{MacroWeights, Metacategory::*};

pub fn all() -> Vec<CategoryConfig> {
    vec![tv(), fridge(), air_conditioner(), robot_vacuum(), washer()]
}

fn score(id: &str) -> FieldPath {
    FieldPath::Score(id.to_string())
}

fn spec(key: &str) -> FieldPath {
    FieldPath::Spec(key.to_string())
}

fn editorial() -> N {
    N::Linear { min: 0.0, max: 10.0 }
}

fn fields(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

pub fn tv() -> CategoryConfig {
    type C = CriterionDefinition;
    CategoryConfig {
        id: "tv".into(),
        label: "Smart TVs".into(),
        spec_fields: fields(&[
            "panel_type",
            "peak_brightness_nits",
            "refresh_rate_hz",
            "input_lag_ms",
            "hdmi_2_1_ports",
            "power_watts",
            "pwm_dimming",
            "local_dimming",
            "screen_size_inches",
            "energy_kwh_month",
        ]),
        criteria: vec![
            C::new("c1", "Custo-Benefício", score("c1"), 0.15, editorial(), Economy),
            C::new(
                "c2",
                "Qualidade de Imagem",
                spec("panel_type"),
                0.20,
                N::mapping([
                    ("OLED", 10.0),
                    ("QD-OLED", 10.0),
                    ("Mini-LED", 9.0),
                    ("QLED", 7.5),
                    ("NanoCell", 6.5),
                    ("LED", 5.0),
                ]),
                Performance,
            ),
            C::new(
                "c3",
                "Brilho",
                spec("peak_brightness_nits"),
                0.10,
                N::Logarithmic { scale_factor: 3.0 },
                Performance,
            ),
            C::new(
                "c4",
                "Taxa de Atualização",
                spec("refresh_rate_hz"),
                0.10,
                N::Linear { min: 60.0, max: 144.0 },
                Performance,
            ),
            C::new(
                "c5",
                "Input Lag",
                spec("input_lag_ms"),
                0.08,
                N::InverseExp { reference: 5.0, decay: 0.05 },
                Performance,
            ),
            C::new("c6", "Sistema Smart", score("c6"), 0.07, editorial(), Usability),
            C::new("c7", "Áudio", score("c7"), 0.05, editorial(), Usability),
            C::new(
                "c8",
                "Conectividade HDMI 2.1",
                spec("hdmi_2_1_ports"),
                0.08,
                N::Linear { min: 0.0, max: 4.0 },
                Usability,
            )
            .when_missing(MissingValueStrategy::Zero),
            C::new(
                "c9",
                "Consumo de Energia",
                spec("power_watts"),
                0.07,
                N::Linear { min: 50.0, max: 250.0 },
                Economy,
            )
            .minimize(),
            C::new("c10", "Confiabilidade", score("c10"), 0.10, editorial(), Construction).veto_at(2.0),
        ],
        extended_criteria: vec![
            C::new(
                "x1",
                "Cintilação (PWM)",
                spec("pwm_dimming"),
                0.10,
                N::Boolean {
                    true_score: 2.0,
                    false_score: 10.0,
                },
                Usability,
            )
            .hidden_truth("Controla o brilho por PWM; pode cansar a vista em sessões longas"),
            C::new(
                "x2",
                "Local Dimming",
                spec("local_dimming"),
                0.10,
                N::boolean(),
                Construction,
            )
            .hidden_truth("Sem local dimming: pretos acinzentados em ambientes escuros"),
        ],
        contexts: vec![
            UseCaseContext::new("gaming", "Jogos", [("c4", 2.0), ("c5", 2.5), ("c8", 2.0)]),
            UseCaseContext::new("cinema", "Filmes e Séries", [("c2", 2.0), ("c3", 1.5), ("c7", 1.5)]),
            UseCaseContext::new("sala_clara", "Sala Clara", [("c3", 2.5), ("c2", 1.2)]),
        ],
        hybrid_alpha: DEFAULT_HYBRID_ALPHA,
        veto_penalty: DEFAULT_VETO_PENALTY,
        macro_weights: MacroWeights {
            performance: 0.40,
            usability: 0.25,
            construction: 0.20,
            economy: 0.15,
        },
    }
}

pub fn fridge() -> CategoryConfig {
    type C = CriterionDefinition;
    CategoryConfig {
        id: "fridge".into(),
        label: "Geladeiras".into(),
        spec_fields: fields(&[
            "energy_kwh_month",
            "capacity_liters",
            "compressor_type",
            "frost_free",
            "noise_db",
            "compressor_warranty_years",
            "digital_control",
        ]),
        criteria: vec![
            C::new("c1", "Custo-Benefício", score("c1"), 0.15, editorial(), Economy),
            C::new(
                "c2",
                "Eficiência Energética",
                spec("energy_kwh_month"),
                0.15,
                N::Linear { min: 20.0, max: 80.0 },
                Economy,
            )
            .minimize(),
            C::new(
                "c3",
                "Capacidade",
                spec("capacity_liters"),
                0.12,
                N::Logarithmic { scale_factor: 3.6 },
                Performance,
            ),
            C::new(
                "c4",
                "Compressor",
                spec("compressor_type"),
                0.12,
                N::mapping([("Inverter", 10.0), ("Convencional", 5.0)]),
                Performance,
            ),
            C::new("c5", "Frost Free", spec("frost_free"), 0.08, N::boolean(), Usability),
            C::new(
                "c6",
                "Ruído",
                spec("noise_db"),
                0.08,
                N::InverseExp { reference: 35.0, decay: 0.08 },
                Usability,
            ),
            C::new("c7", "Organização Interna", score("c7"), 0.08, editorial(), Usability),
            C::new("c8", "Confiabilidade", score("c8"), 0.10, editorial(), Construction).veto_at(2.0),
            C::new("c9", "Rede de Assistência", score("c9"), 0.07, editorial(), Construction),
            C::new("c10", "Recursos Extras", score("c10"), 0.05, editorial(), Usability)
                .when_missing(MissingValueStrategy::Ignore),
        ],
        extended_criteria: vec![
            C::new(
                "x1",
                "Garantia do Compressor",
                spec("compressor_warranty_years"),
                0.10,
                N::Linear { min: 1.0, max: 10.0 },
                Construction,
            )
            .hidden_truth("Garantia curta do compressor, a peça mais cara de reparar"),
            C::new(
                "x2",
                "Controle Digital",
                spec("digital_control"),
                0.05,
                N::boolean(),
                Usability,
            ),
        ],
        contexts: vec![
            UseCaseContext::new("familia_grande", "Família Grande", [("c3", 2.5), ("c7", 1.5)]),
            UseCaseContext::new("economia", "Economia de Energia", [("c2", 2.5), ("c4", 1.5)]),
        ],
        hybrid_alpha: DEFAULT_HYBRID_ALPHA,
        veto_penalty: DEFAULT_VETO_PENALTY,
        macro_weights: MacroWeights {
            performance: 0.30,
            usability: 0.20,
            construction: 0.25,
            economy: 0.25,
        },
    }
}

pub fn air_conditioner() -> CategoryConfig {
    type C = CriterionDefinition;
    CategoryConfig {
        id: "air_conditioner".into(),
        label: "Ar-Condicionado".into(),
        spec_fields: fields(&[
            "idrs",
            "compressor_type",
            "indoor_noise_db",
            "filter_type",
            "wifi",
            "coil_material",
            "btus",
            "energy_kwh_month",
        ]),
        criteria: vec![
            C::new("c1", "Custo-Benefício", score("c1"), 0.15, editorial(), Economy),
            C::new(
                "c2",
                "Eficiência (IDRS)",
                spec("idrs"),
                0.18,
                N::Linear { min: 5.0, max: 9.0 },
                Economy,
            ),
            C::new(
                "c3",
                "Tecnologia do Compressor",
                spec("compressor_type"),
                0.12,
                N::mapping([("Inverter", 10.0), ("Dual Inverter", 10.0), ("On/Off", 4.0)]),
                Performance,
            ),
            C::new(
                "c4",
                "Ruído Interno",
                spec("indoor_noise_db"),
                0.10,
                N::InverseExp { reference: 20.0, decay: 0.07 },
                Usability,
            ),
            C::new("c5", "Capacidade de Refrigeração", score("c5"), 0.10, editorial(), Performance),
            C::new(
                "c6",
                "Filtragem",
                spec("filter_type"),
                0.07,
                N::mapping([("HEPA", 10.0), ("Antibacteriano", 7.0), ("Comum", 4.0)]),
                Usability,
            ),
            C::new("c7", "Wi-Fi", spec("wifi"), 0.05, N::boolean(), Usability)
                .when_missing(MissingValueStrategy::Zero),
            C::new("c8", "Confiabilidade", score("c8"), 0.10, editorial(), Construction).veto_at(2.0),
            C::new(
                "c9",
                "Serpentina",
                spec("coil_material"),
                0.08,
                N::mapping([("Cobre", 10.0), ("Alumínio", 4.0)]),
                Construction,
            )
            .hidden_truth("Serpentina de alumínio corrói mais rápido em regiões litorâneas"),
            C::new("c10", "Rede de Assistência", score("c10"), 0.05, editorial(), Construction),
        ],
        extended_criteria: vec![],
        contexts: vec![
            UseCaseContext::new("quarto", "Quarto", [("c4", 3.0)]),
            UseCaseContext::new("uso_intenso", "Uso Intenso", [("c2", 2.0), ("c3", 2.0), ("c8", 1.5)]),
        ],
        hybrid_alpha: DEFAULT_HYBRID_ALPHA,
        veto_penalty: DEFAULT_VETO_PENALTY,
        macro_weights: MacroWeights {
            performance: 0.30,
            usability: 0.20,
            construction: 0.25,
            economy: 0.25,
        },
    }
}

pub fn robot_vacuum() -> CategoryConfig {
    type C = CriterionDefinition;
    CategoryConfig {
        id: "robot_vacuum".into(),
        label: "Robôs Aspiradores".into(),
        spec_fields: fields(&[
            "navigation",
            "suction_pa",
            "battery_minutes",
            "noise_db",
            "mop",
            "self_empty_dock",
            "obstacle_avoidance",
            "energy_kwh_month",
        ]),
        criteria: vec![
            C::new("c1", "Custo-Benefício", score("c1"), 0.15, editorial(), Economy),
            C::new(
                "c2",
                "Navegação",
                spec("navigation"),
                0.20,
                N::mapping([
                    ("LiDAR", 10.0),
                    ("vSLAM", 7.5),
                    ("Giroscópio", 5.0),
                    ("Aleatória", 2.0),
                ]),
                Performance,
            )
            .veto_at(2.0),
            C::new(
                "c3",
                "Sucção",
                spec("suction_pa"),
                0.12,
                N::Logarithmic { scale_factor: 2.6 },
                Performance,
            ),
            C::new(
                "c4",
                "Autonomia",
                spec("battery_minutes"),
                0.10,
                N::Linear { min: 60.0, max: 240.0 },
                Performance,
            ),
            C::new(
                "c5",
                "Ruído",
                spec("noise_db"),
                0.06,
                N::InverseExp { reference: 55.0, decay: 0.06 },
                Usability,
            ),
            C::new("c6", "Aplicativo", score("c6"), 0.08, editorial(), Usability),
            C::new("c7", "Função Mop", spec("mop"), 0.07, N::boolean(), Usability)
                .when_missing(MissingValueStrategy::Zero),
            C::new("c8", "Base Autoesvaziante", spec("self_empty_dock"), 0.07, N::boolean(), Usability)
                .when_missing(MissingValueStrategy::Zero),
            C::new("c9", "Confiabilidade", score("c9"), 0.08, editorial(), Construction),
            C::new("c10", "Peças de Reposição", score("c10"), 0.07, editorial(), Construction),
        ],
        extended_criteria: vec![C::new(
            "x1",
            "Desvio de Obstáculos",
            spec("obstacle_avoidance"),
            0.10,
            N::boolean(),
            Performance,
        )
        .hidden_truth("Não desvia de fios e objetos pequenos no chão")],
        contexts: vec![
            UseCaseContext::new("pets", "Casa com Pets", [("c3", 2.5), ("c8", 2.0)]),
            UseCaseContext::new("apartamento", "Apartamento Pequeno", [("c1", 1.5), ("c5", 2.0)]),
        ],
        hybrid_alpha: DEFAULT_HYBRID_ALPHA,
        veto_penalty: DEFAULT_VETO_PENALTY,
        macro_weights: MacroWeights {
            performance: 0.40,
            usability: 0.25,
            construction: 0.20,
            economy: 0.15,
        },
    }
}

pub fn washer() -> CategoryConfig {
    type C = CriterionDefinition;
    CategoryConfig {
        id: "washer".into(),
        label: "Lavadoras".into(),
        spec_fields: fields(&[
            "capacity_kg",
            "energy_kwh_cycle",
            "water_liters_cycle",
            "motor_type",
            "spin_rpm",
            "noise_db",
            "dryer",
            "energy_kwh_month",
        ]),
        criteria: vec![
            C::new("c1", "Custo-Benefício", score("c1"), 0.15, editorial(), Economy),
            C::new(
                "c2",
                "Capacidade",
                spec("capacity_kg"),
                0.12,
                N::Linear { min: 8.0, max: 18.0 },
                Performance,
            ),
            C::new(
                "c3",
                "Eficiência Energética",
                spec("energy_kwh_cycle"),
                0.12,
                N::Linear { min: 0.1, max: 0.6 },
                Economy,
            )
            .minimize(),
            C::new(
                "c4",
                "Consumo de Água",
                spec("water_liters_cycle"),
                0.08,
                N::Linear { min: 50.0, max: 200.0 },
                Economy,
            )
            .minimize(),
            C::new(
                "c5",
                "Motor",
                spec("motor_type"),
                0.12,
                N::mapping([("Direct Drive", 10.0), ("Inverter", 8.5), ("Convencional", 5.0)]),
                Construction,
            ),
            C::new(
                "c6",
                "Centrifugação",
                spec("spin_rpm"),
                0.08,
                N::Linear { min: 600.0, max: 1400.0 },
                Performance,
            ),
            C::new(
                "c7",
                "Ruído",
                spec("noise_db"),
                0.07,
                N::InverseExp { reference: 45.0, decay: 0.06 },
                Usability,
            ),
            C::new("c8", "Programas de Lavagem", score("c8"), 0.08, editorial(), Usability),
            C::new("c9", "Confiabilidade", score("c9"), 0.10, editorial(), Construction).veto_at(2.0),
            C::new("c10", "Lava e Seca", spec("dryer"), 0.08, N::boolean(), Usability)
                .when_missing(MissingValueStrategy::Zero),
        ],
        extended_criteria: vec![],
        contexts: vec![
            UseCaseContext::new("familia_grande", "Família Grande", [("c2", 2.5), ("c6", 1.5)]),
            UseCaseContext::new("economia", "Economia", [("c3", 2.0), ("c4", 2.0)]),
        ],
        hybrid_alpha: DEFAULT_HYBRID_ALPHA,
        veto_penalty: DEFAULT_VETO_PENALTY,
        macro_weights: MacroWeights::default(),
    }
}
