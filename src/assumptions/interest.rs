//! Debt held by the public and the rates it is financed at

use serde::{Deserialize, Serialize};

/// Interest-on-debt assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestAssumptions {
    /// Debt held by the public in the base year ($ billions)
    pub debt_held_by_public: f64,

    /// Average effective rate on the outstanding stock
    pub current_average_rate: f64,

    /// Rate the stock converges to as it is refinanced
    pub long_run_rate: f64,

    /// Share of the gap to the long-run rate closed each year
    pub refinancing_share: f64,

    /// Primary deficit financed by new borrowing, as a share of GDP
    pub primary_deficit_share: f64,

    /// Standard deviation of the once-per-path rate regime shift
    pub rate_regime_sd: f64,

    /// Standard deviation of yearly rate noise
    pub rate_noise_sd: f64,
}

impl Default for InterestAssumptions {
    fn default() -> Self {
        Self {
            debt_held_by_public: 29_000.0,
            current_average_rate: 0.033,
            long_run_rate: 0.038,
            refinancing_share: 0.15,
            primary_deficit_share: 0.03,
            rate_regime_sd: 0.004,
            rate_noise_sd: 0.002,
        }
    }
}

impl InterestAssumptions {
    /// Effective rate after one more year of refinancing toward `target`
    pub fn refinance(&self, current: f64, target: f64) -> f64 {
        current + (target - current) * self.refinancing_share
    }
}
