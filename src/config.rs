//! Service configuration read from the environment

use crate::categories::WeightPolicy;
use crate::tco::DEFAULT_ENERGY_RATE;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    /// JSON product catalog; the bundled demo catalog when unset
    pub catalog_path: Option<PathBuf>,
    pub weight_policy: WeightPolicy,
    /// BRL per kWh
    pub energy_rate: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog_path: None,
            weight_policy: WeightPolicy::Strict,
            energy_rate: DEFAULT_ENERGY_RATE,
        }
    }
}

impl ServiceConfig {
    /// `COMPARATOP_PORT`, `COMPARATOP_CATALOG_PATH`,
    /// `COMPARATOP_WEIGHT_POLICY` (strict|normalize), `COMPARATOP_ENERGY_RATE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup("COMPARATOP_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid COMPARATOP_PORT '{}'", port))?;
        }
        if let Some(path) = lookup("COMPARATOP_CATALOG_PATH").filter(|p| !p.trim().is_empty()) {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup("COMPARATOP_WEIGHT_POLICY") {
            config.weight_policy = policy.parse().map_err(|e: String| anyhow!(e))?;
        }
        if let Some(rate) = lookup("COMPARATOP_ENERGY_RATE") {
            let rate: f64 = rate
                .trim()
                .parse()
                .with_context(|| format!("invalid COMPARATOP_ENERGY_RATE '{}'", rate))?;
            if !rate.is_finite() || rate < 0.0 {
                return Err(anyhow!("COMPARATOP_ENERGY_RATE must be non-negative, got {}", rate));
            }
            config.energy_rate = rate;
        }

        Ok(config)
    }
}
