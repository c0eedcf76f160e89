//! Federal receipts by source

use serde::{Deserialize, Serialize};

use crate::projection::guarded_div;

/// Base-year receipts ($ billions), growth elasticities, noise and tax rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    pub individual_income: f64,
    pub payroll: f64,
    pub corporate: f64,
    pub other: f64,

    /// Receipts growth per unit of nominal GDP growth, by source
    pub individual_income_elasticity: f64,
    pub payroll_elasticity: f64,
    pub corporate_elasticity: f64,
    pub other_elasticity: f64,

    /// Yearly multiplicative noise by source
    pub individual_income_noise_sd: f64,
    pub payroll_noise_sd: f64,
    pub corporate_noise_sd: f64,
    pub other_noise_sd: f64,

    /// Standard deviation of the per-path growth regime shift
    pub growth_regime_sd: f64,

    /// Rates in effect
    pub individual_income_rate: f64,
    pub payroll_rate: f64,
    pub corporate_rate: f64,

    /// Rates the base-year receipts were observed under
    pub baseline_individual_income_rate: f64,
    pub baseline_payroll_rate: f64,
    pub baseline_corporate_rate: f64,
}

impl Default for RevenueAssumptions {
    fn default() -> Self {
        Self {
            individual_income: 2_500.0,
            payroll: 1_700.0,
            corporate: 500.0,
            other: 330.0,
            individual_income_elasticity: 1.1,
            payroll_elasticity: 1.0,
            corporate_elasticity: 1.2,
            other_elasticity: 0.8,
            individual_income_noise_sd: 0.03,
            payroll_noise_sd: 0.015,
            corporate_noise_sd: 0.06,
            other_noise_sd: 0.02,
            growth_regime_sd: 0.005,
            individual_income_rate: 0.22,
            payroll_rate: 0.153,
            corporate_rate: 0.21,
            baseline_individual_income_rate: 0.22,
            baseline_payroll_rate: 0.153,
            baseline_corporate_rate: 0.21,
        }
    }
}

impl RevenueAssumptions {
    /// Receipts scaling from rate changes: `current / baseline` per source
    ///
    /// Returned as (individual, payroll, corporate). A zero baseline rate
    /// leaves that source unscaled.
    pub fn rate_ratios(&self) -> (f64, f64, f64) {
        (
            guarded_div(
                self.individual_income_rate,
                self.baseline_individual_income_rate,
                1.0,
                "individual income rate ratio",
            ),
            guarded_div(
                self.payroll_rate,
                self.baseline_payroll_rate,
                1.0,
                "payroll rate ratio",
            ),
            guarded_div(
                self.corporate_rate,
                self.baseline_corporate_rate,
                1.0,
                "corporate rate ratio",
            ),
        )
    }

    /// Base-year total receipts
    pub fn base_total(&self) -> f64 {
        self.individual_income + self.payroll + self.corporate + self.other
    }
}
