//! Total cost of ownership
//!
//! `total = price + Σ energy(y) + maintenance`, where each year's energy
//! bill is inflated by the energy price trend and discounted back to
//! present value. Maintenance is a flat yearly reserve.

use crate::error::TcoError;
use crate::profiles::category_profile;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIFESPAN_YEARS: f64 = 5.0;
pub const DEFAULT_MAINTENANCE_RATE: f64 = 0.02;
pub const DEFAULT_ENERGY_INFLATION: f64 = 0.05;
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.02;
/// BRL per kWh
pub const DEFAULT_ENERGY_RATE: f64 = 0.85;
/// Longest ownership horizon accepted
pub const MAX_LIFESPAN_YEARS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcoInput {
    pub price: f64,
    pub energy_kwh_month: f64,
    #[serde(default = "default_energy_rate")]
    pub energy_rate: f64,
    #[serde(default = "default_lifespan")]
    pub lifespan_years: f64,
    #[serde(default = "default_maintenance_rate")]
    pub maintenance_rate: f64,
    #[serde(default = "default_inflation")]
    pub inflation_rate: f64,
    #[serde(default = "default_discount")]
    pub discount_rate: f64,
}

fn default_energy_rate() -> f64 {
    DEFAULT_ENERGY_RATE
}

fn default_lifespan() -> f64 {
    DEFAULT_LIFESPAN_YEARS
}

fn default_maintenance_rate() -> f64 {
    DEFAULT_MAINTENANCE_RATE
}

fn default_inflation() -> f64 {
    DEFAULT_ENERGY_INFLATION
}

fn default_discount() -> f64 {
    DEFAULT_DISCOUNT_RATE
}

impl TcoInput {
    pub fn new(price: f64, energy_kwh_month: f64) -> Self {
        Self {
            price,
            energy_kwh_month,
            energy_rate: DEFAULT_ENERGY_RATE,
            lifespan_years: DEFAULT_LIFESPAN_YEARS,
            maintenance_rate: DEFAULT_MAINTENANCE_RATE,
            inflation_rate: DEFAULT_ENERGY_INFLATION,
            discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }

    /// Category energy draw, horizon and maintenance reserve
    pub fn for_category(category_id: &str, price: f64) -> Option<Self> {
        let profile = category_profile(category_id)?;
        Some(Self {
            lifespan_years: profile.default_lifespan_years,
            maintenance_rate: profile.maintenance_rate,
            ..Self::new(price, profile.energy_kwh_month)
        })
    }

    pub fn with_lifespan(mut self, years: f64) -> Self {
        self.lifespan_years = years;
        self
    }

    pub fn with_energy_rate(mut self, rate: f64) -> Self {
        self.energy_rate = rate;
        self
    }

    pub fn with_maintenance_rate(mut self, rate: f64) -> Self {
        self.maintenance_rate = rate;
        self
    }

    pub fn with_energy_kwh_month(mut self, kwh: f64) -> Self {
        self.energy_kwh_month = kwh;
        self
    }

    pub fn validate(&self) -> Result<(), TcoError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(TcoError::InvalidPrice(self.price));
        }
        if !self.lifespan_years.is_finite()
            || self.lifespan_years <= 0.0
            || self.lifespan_years > MAX_LIFESPAN_YEARS
        {
            return Err(TcoError::InvalidLifespan(self.lifespan_years));
        }
        let rates = [
            ("energyKwhMonth", self.energy_kwh_month),
            ("energyRate", self.energy_rate),
            ("maintenanceRate", self.maintenance_rate),
            ("inflationRate", self.inflation_rate),
            ("discountRate", self.discount_rate),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(TcoError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}

/// Request body of the TCO endpoint. Anything omitted comes from the
/// category profile, then from the global defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcoRequest {
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub energy_kwh_month: Option<f64>,
    #[serde(default)]
    pub energy_rate: Option<f64>,
    #[serde(default)]
    pub lifespan_years: Option<f64>,
    #[serde(default)]
    pub maintenance_rate: Option<f64>,
}

impl TcoRequest {
    pub fn resolve(&self, default_energy_rate: f64) -> Result<TcoInput, TcoError> {
        let base = match self.category_id.as_deref().and_then(|c| TcoInput::for_category(c, self.price)) {
            Some(input) => input,
            None => {
                let kwh = self.energy_kwh_month.ok_or(TcoError::MissingEnergy)?;
                TcoInput::new(self.price, kwh)
            }
        };

        let input = TcoInput {
            energy_kwh_month: self.energy_kwh_month.unwrap_or(base.energy_kwh_month),
            energy_rate: self.energy_rate.unwrap_or(default_energy_rate),
            lifespan_years: self.lifespan_years.unwrap_or(base.lifespan_years),
            maintenance_rate: self.maintenance_rate.unwrap_or(base.maintenance_rate),
            ..base
        };
        input.validate()?;
        Ok(input)
    }
}

/// Currency values in whole BRL
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TcoBreakdown {
    pub acquisition_cost: i64,
    pub energy_cost: i64,
    pub maintenance_cost: i64,
    pub total_tco: i64,
    pub tco_per_year: i64,
    pub tco_per_month: i64,
    pub lifespan_years: f64,
    pub energy_rate: f64,
}

/// Present value of the energy bill in year `year` (1-based)
fn energy_present_value(input: &TcoInput, year: f64) -> f64 {
    let nominal = input.energy_kwh_month * 12.0 * input.energy_rate;
    let growth = (1.0 + input.inflation_rate) / (1.0 + input.discount_rate);
    nominal * growth.powf(year)
}

/// Discounted energy over the horizon; a fractional final year is pro-rated
fn energy_cost(input: &TcoInput) -> f64 {
    let whole_years = input.lifespan_years.floor();
    let fraction = input.lifespan_years - whole_years;

    let mut total: f64 = (1..=whole_years as u32)
        .map(|y| energy_present_value(input, y as f64))
        .sum();
    if fraction > 0.0 {
        total += energy_present_value(input, whole_years + 1.0) * fraction;
    }
    total
}

pub fn calculate_tco(input: &TcoInput) -> Result<TcoBreakdown, TcoError> {
    input.validate()?;

    let energy = energy_cost(input);
    let maintenance = input.price * input.maintenance_rate * input.lifespan_years;
    let total = input.price + energy + maintenance;

    Ok(TcoBreakdown {
        acquisition_cost: input.price.round() as i64,
        energy_cost: energy.round() as i64,
        maintenance_cost: maintenance.round() as i64,
        total_tco: total.round() as i64,
        tco_per_year: (total / input.lifespan_years).round() as i64,
        tco_per_month: (total / (input.lifespan_years * 12.0)).round() as i64,
        lifespan_years: input.lifespan_years,
        energy_rate: input.energy_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_tco_is_price() {
        let input = TcoInput::new(1000.0, 0.0).with_maintenance_rate(0.0);
        let tco = calculate_tco(&input).unwrap();

        assert_eq!(tco.total_tco, 1000);
        assert_eq!(tco.energy_cost, 0);
        assert_eq!(tco.maintenance_cost, 0);
        assert_eq!(tco.tco_per_year, 200);
    }

    #[test]
    fn test_literal_degenerate_case() {
        let input = TcoInput::new(1000.0, 0.0)
            .with_energy_rate(1.0)
            .with_lifespan(1.0)
            .with_maintenance_rate(0.0);
        let tco = calculate_tco(&input).unwrap();

        assert_eq!(tco.total_tco, 1000);
        assert_eq!(tco.acquisition_cost, 1000);
        assert_eq!(tco.tco_per_year, 1000);
        assert_eq!(tco.lifespan_years, 1.0);
        assert_eq!(tco.energy_rate, 1.0);
    }

    #[test]
    fn test_monotonic_up_to_longest_horizon() {
        let mut last = 0;
        for years in [1.0, 10.0, 25.0, 50.0, 99.5, MAX_LIFESPAN_YEARS] {
            let tco = calculate_tco(&TcoInput::new(3000.0, 40.0).with_lifespan(years)).unwrap();
            assert!(tco.total_tco > last, "TCO dropped at {} years", years);
            assert!(tco.total_tco < i64::MAX);
            last = tco.total_tco;
        }
    }

    #[test]
    fn test_horizon_beyond_limit_is_rejected() {
        for years in [100.5, 10_000.0, 40_000.0, 1e12] {
            assert_eq!(
                calculate_tco(&TcoInput::new(3000.0, 40.0).with_lifespan(years)),
                Err(TcoError::InvalidLifespan(years))
            );
        }
    }

    #[test]
    fn test_monotonic_in_lifespan() {
        let mut last = 0;
        for years in [1.0, 2.0, 3.5, 5.0, 8.0, 12.0] {
            let tco = calculate_tco(&TcoInput::new(3000.0, 40.0).with_lifespan(years)).unwrap();
            assert!(tco.total_tco >= last, "TCO dropped at {} years", years);
            last = tco.total_tco;
        }
    }

    #[test]
    fn test_energy_compounds_and_discounts() {
        // one year: 10 kWh × 12 × 1.0 × 1.05 / 1.02
        let input = TcoInput::new(0.0, 10.0)
            .with_energy_rate(1.0)
            .with_lifespan(1.0)
            .with_maintenance_rate(0.0);
        let expected = 120.0 * 1.05 / 1.02;
        assert!((energy_cost(&input) - expected).abs() < 1e-9);
        assert_eq!(calculate_tco(&input).unwrap().energy_cost, expected.round() as i64);
    }

    #[test]
    fn test_fractional_year_is_prorated() {
        let base = TcoInput::new(0.0, 10.0).with_maintenance_rate(0.0);
        let two = energy_cost(&base.with_lifespan(2.0));
        let three = energy_cost(&base.with_lifespan(3.0));
        let two_and_half = energy_cost(&base.with_lifespan(2.5));

        assert!((two_and_half - (two + (three - two) * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_is_linear() {
        let input = TcoInput::new(2000.0, 0.0).with_lifespan(5.0);
        let tco = calculate_tco(&input).unwrap();
        assert_eq!(tco.maintenance_cost, 200);
        assert_eq!(tco.total_tco, 2200);
        assert_eq!(tco.tco_per_month, (2200.0_f64 / 60.0).round() as i64);
    }

    #[test]
    fn test_category_defaults() {
        let tv = TcoInput::for_category("tv", 4000.0).unwrap();
        assert_eq!(tv.energy_kwh_month, 15.0);
        assert_eq!(tv.lifespan_years, 7.0);
        assert_eq!(tv.energy_rate, DEFAULT_ENERGY_RATE);
        assert!(TcoInput::for_category("toaster", 100.0).is_none());
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            calculate_tco(&TcoInput::new(-1.0, 10.0)),
            Err(TcoError::InvalidPrice(-1.0))
        );
        assert_eq!(
            calculate_tco(&TcoInput::new(100.0, 10.0).with_lifespan(0.0)),
            Err(TcoError::InvalidLifespan(0.0))
        );
        assert!(matches!(
            calculate_tco(&TcoInput::new(100.0, 10.0).with_energy_rate(-0.5)),
            Err(TcoError::InvalidRate { name: "energyRate", .. })
        ));
    }

    #[test]
    fn test_request_resolution() {
        let req = TcoRequest {
            price: 3000.0,
            category_id: Some("fridge".into()),
            lifespan_years: Some(10.0),
            ..Default::default()
        };
        let input = req.resolve(0.9).unwrap();
        assert_eq!(input.energy_kwh_month, 40.0);
        assert_eq!(input.lifespan_years, 10.0);
        assert_eq!(input.energy_rate, 0.9);

        let bare = TcoRequest {
            price: 100.0,
            ..Default::default()
        };
        assert_eq!(bare.resolve(0.85), Err(TcoError::MissingEnergy));
    }
}
